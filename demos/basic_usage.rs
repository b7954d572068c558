//! Basic SPMC usage: one writer, four cooperating readers sharing a cursor.
//!
//! Each published message is delivered to exactly one of the four readers.

use std::sync::atomic::{ AtomicBool, AtomicU64, Ordering };
use std::thread;

use seqring::RingBuffer;

const RING_SLOTS: usize = 1024;
const PAYLOAD_SIZE: usize = 8;
const MESSAGE_COUNT: u64 = 200_000;
const NUM_READERS: usize = 4;

fn main() {
    tracing_subscriber::fmt::init();

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("  ║  seqring - SPMC seqlock ring buffer                    ║");
    println!("  ╚════════════════════════════════════════════════════════╝\n");

    let buf: RingBuffer<PAYLOAD_SIZE, RING_SLOTS> = RingBuffer::new();
    let reader = buf.reader();
    let received = AtomicU64::new(0);
    let writer_done = AtomicBool::new(false);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..NUM_READERS)
            .map(|id| {
                let reader = &reader;
                let received = &received;
                let writer_done = &writer_done;
                scope.spawn(move || {
                    let mut count = 0u64;
                    let mut sum = 0u64;
                    loop {
                        match reader.pop_front() {
                            Some(payload) => {
                                sum += u64::from_le_bytes(payload);
                                count += 1;
                                received.fetch_add(1, Ordering::Relaxed);
                            }
                            None => {
                                if writer_done.load(Ordering::Acquire) {
                                    break;
                                }
                                std::hint::spin_loop();
                            }
                        }
                    }
                    println!("  reader {id}: claimed {count} messages, sum={sum}");
                    (count, sum)
                })
            })
            .collect();

        let writer = buf.try_lock().expect("no other writer should be active");
        for i in 0..MESSAGE_COUNT {
            writer.push_back(i.to_le_bytes());
        }
        drop(writer);
        writer_done.store(true, Ordering::Release);

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("reader thread panicked"))
            .collect();

        let total_claimed: u64 = results.iter().map(|(count, _)| count).sum();
        let total_sum: u64 = results.iter().map(|(_, sum)| sum).sum();
        let expected_sum = (MESSAGE_COUNT * (MESSAGE_COUNT - 1)) / 2;

        println!("\n  Published:      {MESSAGE_COUNT}");
        println!("  Claimed total:  {total_claimed}");
        println!("  Sum (claimed):  {total_sum}");
        println!("  Sum (expected if nothing overrun): {expected_sum}");

        if total_claimed <= MESSAGE_COUNT {
            println!("\n  no message was delivered twice across the 4 readers");
        } else {
            println!("\n  unexpected: claimed more messages than were published");
        }
    });
}
