//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

/// Standard 3278 display models
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenModel {
    /// 24 rows by 80 columns
    #[default]
    Model2,
    /// 32 rows by 80 columns
    Model3,
    /// 43 rows by 80 columns
    Model4,
    /// 27 rows by 132 columns
    Model5,
}

impl ScreenModel {
    /// `(width, height)` of the model's alternate screen size
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            ScreenModel::Model2 => (80, 24),
            ScreenModel::Model3 => (80, 32),
            ScreenModel::Model4 => (80, 43),
            ScreenModel::Model5 => (132, 27),
        }
    }

    /// Number of buffer positions
    pub fn buffer_size(self) -> usize {
        let (width, height) = self.dimensions();
        width * height
    }

    /// Terminal type reported during negotiation (extended data stream variant)
    pub fn device_type(self) -> &'static str {
        match self {
            ScreenModel::Model2 => "IBM-3278-2-E",
            ScreenModel::Model3 => "IBM-3278-3-E",
            ScreenModel::Model4 => "IBM-3278-4-E",
            ScreenModel::Model5 => "IBM-3278-5-E",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_dimensions() {
        assert_eq!(ScreenModel::Model2.dimensions(), (80, 24));
        assert_eq!(ScreenModel::Model2.buffer_size(), 1920);
        assert_eq!(ScreenModel::Model5.buffer_size(), 3564);
        assert_eq!(ScreenModel::default(), ScreenModel::Model2);
    }

    #[test]
    fn test_model_device_type() {
        assert_eq!(ScreenModel::Model4.device_type(), "IBM-3278-4-E");
    }
}
