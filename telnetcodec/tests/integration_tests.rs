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

//! Integration tests for telnetcodec
//!
//! These tests drive a terminal side codec against a host side codec the way a TN3270
//! server and client negotiate on a fresh connection.

use bytes::BytesMut;
use tn3270_telnetcodec::tn3270e::{Tn3270eFunction, Tn3270eMessage};
use tn3270_telnetcodec::ttype::TerminalTypeMessage;
use tn3270_telnetcodec::{TelnetArgument, TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption, TelnetSide};
use tokio_util::codec::{Decoder, Encoder};

// ============================================================================
// Helper Functions
// ============================================================================

/// A host side codec that accepts and offers the 3270 options.
fn host_codec() -> TelnetCodec {
    let mut codec = TelnetCodec::new();
    for option in [
        TelnetOption::TerminalType,
        TelnetOption::EndOfRecord,
        TelnetOption::TransmitBinary,
        TelnetOption::TN3270E,
    ] {
        codec.set_supported(option, true, true);
    }
    codec
}

fn encode_frames(codec: &mut TelnetCodec, frames: Vec<TelnetFrame>) -> BytesMut {
    let mut buffer = BytesMut::new();
    for frame in frames {
        codec.encode(frame, &mut buffer).unwrap();
    }
    buffer
}

fn decode_all(codec: &mut TelnetCodec, buffer: &mut BytesMut) -> Vec<TelnetEvent> {
    let mut events = Vec::new();
    while let Some(event) = codec.decode(buffer).unwrap() {
        events.push(event);
    }
    events
}

/// Deliver a batch of frames and return what the receiver wants to send back.
fn exchange(
    sender: &mut TelnetCodec,
    receiver: &mut TelnetCodec,
    frames: Vec<TelnetFrame>,
) -> (Vec<TelnetEvent>, Vec<TelnetFrame>) {
    let mut wire = encode_frames(sender, frames);
    let events = decode_all(receiver, &mut wire);
    (events, receiver.take_responses())
}

// ============================================================================
// Basic TN3270 (RFC 1576) Negotiation
// ============================================================================

#[test]
fn basic_tn3270_negotiation() {
    let mut host = host_codec();
    let mut terminal = TelnetCodec::new();
    terminal.set_supported(TelnetOption::TN3270E, false, false);

    let requests = vec![
        host.enable_remote(TelnetOption::TN3270E).unwrap(),
        host.enable_remote(TelnetOption::TerminalType).unwrap(),
    ];
    let (_, replies) = exchange(&mut host, &mut terminal, requests);
    assert_eq!(
        replies,
        vec![
            TelnetFrame::Wont(TelnetOption::TN3270E),
            TelnetFrame::Will(TelnetOption::TerminalType),
        ]
    );

    let (events, _) = exchange(&mut terminal, &mut host, replies);
    assert!(events.contains(&TelnetEvent::OptionStatus(
        TelnetOption::TerminalType,
        TelnetSide::Remote,
        true
    )));
    assert!(!host.is_enabled_remote(TelnetOption::TN3270E));

    let (events, _) = exchange(
        &mut host,
        &mut terminal,
        vec![TelnetFrame::Subnegotiate(TelnetArgument::TerminalType(
            TerminalTypeMessage::Send,
        ))],
    );
    assert_eq!(
        events,
        vec![TelnetEvent::Subnegotiate(TelnetArgument::TerminalType(
            TerminalTypeMessage::Send
        ))]
    );

    let (events, _) = exchange(
        &mut terminal,
        &mut host,
        vec![TelnetFrame::Subnegotiate(TelnetArgument::TerminalType(
            TerminalTypeMessage::Is("IBM-3278-2".to_string()),
        ))],
    );
    assert_eq!(
        events,
        vec![TelnetEvent::Subnegotiate(TelnetArgument::TerminalType(
            TerminalTypeMessage::Is("IBM-3278-2".to_string())
        ))]
    );

    let requests = vec![
        host.enable_remote(TelnetOption::EndOfRecord).unwrap(),
        host.enable_local(TelnetOption::EndOfRecord).unwrap(),
        host.enable_remote(TelnetOption::TransmitBinary).unwrap(),
        host.enable_local(TelnetOption::TransmitBinary).unwrap(),
    ];
    let (_, replies) = exchange(&mut host, &mut terminal, requests);
    assert_eq!(replies.len(), 4);
    let (_, replies) = exchange(&mut terminal, &mut host, replies);
    assert!(replies.is_empty(), "host should be satisfied: {replies:?}");

    for option in [TelnetOption::EndOfRecord, TelnetOption::TransmitBinary] {
        assert!(terminal.is_enabled_local(option));
        assert!(terminal.is_enabled_remote(option));
        assert!(host.is_enabled_local(option));
        assert!(host.is_enabled_remote(option));
    }
}

// ============================================================================
// TN3270E (RFC 2355) Negotiation
// ============================================================================

#[test]
fn tn3270e_device_type_exchange() {
    let mut host = host_codec();
    let mut terminal = TelnetCodec::new();

    let request = host.enable_remote(TelnetOption::TN3270E).unwrap();
    let (_, replies) = exchange(&mut host, &mut terminal, vec![request]);
    assert_eq!(replies, vec![TelnetFrame::Will(TelnetOption::TN3270E)]);
    assert!(terminal.is_enabled_local(TelnetOption::TN3270E));

    let request = TelnetFrame::Subnegotiate(TelnetArgument::Tn3270e(
        Tn3270eMessage::DeviceTypeRequest {
            device_type: "IBM-3278-2-E".to_string(),
            connect: Some("LU000001".to_string()),
        },
    ));
    let (events, _) = exchange(&mut terminal, &mut host, vec![request]);
    assert_eq!(
        events,
        vec![TelnetEvent::Subnegotiate(TelnetArgument::Tn3270e(
            Tn3270eMessage::DeviceTypeRequest {
                device_type: "IBM-3278-2-E".to_string(),
                connect: Some("LU000001".to_string()),
            }
        ))]
    );

    let response = TelnetFrame::Subnegotiate(TelnetArgument::Tn3270e(
        Tn3270eMessage::FunctionsIs(vec![Tn3270eFunction::Responses]),
    ));
    let (events, _) = exchange(&mut host, &mut terminal, vec![response]);
    assert_eq!(
        events,
        vec![TelnetEvent::Subnegotiate(TelnetArgument::Tn3270e(
            Tn3270eMessage::FunctionsIs(vec![Tn3270eFunction::Responses])
        ))]
    );
}

// ============================================================================
// Record Transparency
// ============================================================================

#[test]
fn record_with_iac_payload_survives_the_wire() {
    let mut sender = TelnetCodec::new();
    let mut receiver = TelnetCodec::new();
    let payload = [0x7D, 0xFF, 0x40, 0xFF, 0xFF, 0x11];

    let mut frames: Vec<TelnetFrame> = payload.iter().copied().map(TelnetFrame::Data).collect();
    frames.push(TelnetFrame::EndOfRecord);
    let mut wire = encode_frames(&mut sender, frames);
    assert_eq!(wire.len(), payload.len() + 3 + 2);

    let mut record = Vec::new();
    for event in decode_all(&mut receiver, &mut wire) {
        match event {
            TelnetEvent::Data(byte) => record.push(byte),
            TelnetEvent::EndOfRecord => break,
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(record, payload);
}

#[test]
fn records_split_across_reads() {
    let mut codec = TelnetCodec::new();
    let mut events = Vec::new();
    for chunk in [&[0xF1u8, 0xC3, 0xFF][..], &[0xFF, 0x40, 0xFF][..], &[0xEF][..]] {
        let mut buffer = BytesMut::from(chunk);
        events.extend(decode_all(&mut codec, &mut buffer));
    }
    assert_eq!(
        events,
        vec![
            TelnetEvent::Data(0xF1),
            TelnetEvent::Data(0xC3),
            TelnetEvent::Data(0xFF),
            TelnetEvent::Data(0x40),
            TelnetEvent::EndOfRecord,
        ]
    );
}

#[tokio::test]
async fn framed_stream_over_duplex() {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    let (terminal, host) = tokio::io::duplex(1024);
    let mut writer = FramedWrite::new(host, TelnetCodec::new());
    writer
        .send(TelnetFrame::Do(TelnetOption::EndOfRecord))
        .await
        .unwrap();
    writer.send(TelnetFrame::Data(0xF1)).await.unwrap();
    writer.send(TelnetFrame::EndOfRecord).await.unwrap();
    drop(writer);

    let mut reader = FramedRead::new(terminal, TelnetCodec::new());
    let mut events = Vec::new();
    while let Some(event) = reader.next().await {
        events.push(event.unwrap());
    }
    assert_eq!(
        events,
        vec![
            TelnetEvent::OptionStatus(TelnetOption::EndOfRecord, TelnetSide::Local, true),
            TelnetEvent::Data(0xF1),
            TelnetEvent::EndOfRecord,
        ]
    );
    assert_eq!(
        reader.decoder_mut().take_responses(),
        vec![TelnetFrame::Will(TelnetOption::EndOfRecord)]
    );
}
