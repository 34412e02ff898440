#![cfg(target_os = "linux")]
#![cfg(feature = "tokio-support")]

use afpacket;
use enet_packets::{MacAddr, PlainCodec, ProbeFrame};
use rand::{self, Rng};
use std::{ffi::CString, time::Duration};
use tokio::{self, runtime, time};

fn probe_frame(rng: &mut impl Rng) -> Vec<u8> {
    let body: Vec<u8> = (0..32).map(|_| rng.gen_range(b'a', b'z')).collect();
    ProbeFrame::encode(
        MacAddr::new([0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        MacAddr::new([0x02, 0x00, 0x00, 0x00, 0x00, 0x02]),
        &PlainCodec,
        &body,
    )
    .unwrap()
}

// See afpacket_tests.rs: needs CAP_NET_RAW, run with --ignored.
#[test]
#[ignore]
fn layer2_loopback() {
    // If this takes more than a second to occur, something's definitely wrong.
    let timeout = Duration::from_secs(1);

    let mut rt = runtime::Builder::new()
        .basic_scheduler()
        .enable_all()
        .build()
        .unwrap();

    rt.block_on(async {
        let mut rng = rand::thread_rng();
        let iface_name = CString::new("lo").unwrap();

        let mut side_a = afpacket::AsyncBoundSocket::from_interface(&iface_name).unwrap();
        let mut side_b = afpacket::AsyncBoundSocket::from_interface(&iface_name).unwrap();
        side_b.set_promiscuous(true).unwrap();

        let frame = probe_frame(&mut rng);
        side_a.send(&frame).await.unwrap();

        let received = time::timeout(timeout, async {
            let mut in_buffer = vec![0; 1500];
            loop {
                let (len, _) = side_b.recv(&mut in_buffer).await.unwrap();
                if in_buffer[..len] == frame[..] {
                    return len;
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(received, frame.len());

        side_b.set_promiscuous(false).unwrap();
    });
}
