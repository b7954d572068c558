//! Model-checked interleavings of the shared-reader claim protocol.
//!
//! Only compiled with `--cfg loom` (`RUSTFLAGS="--cfg loom" cargo test --test loom`);
//! `loom` itself is only pulled in under that cfg (see `Cargo.toml`).

#![cfg(loom)]

use seqring::RingBuffer;

const BUF_LEN: usize = 4;
const PAYLOAD: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 0];
const THREADS: [usize; 2] = [1, 2];
const ELEMENTS: usize = 4;

/// S4: K cooperating readers sharing one `ReaderState` never both claim the
/// same message.
fn push_pop_shared(t: usize) {
    let buf = RingBuffer::<8, BUF_LEN>::new();
    let writer = buf.try_lock().unwrap();
    let reader = buf.reader();

    loom::thread::scope(|scope| {
        let reader = &reader;
        for _ in 0..t {
            scope.spawn(move || {
                while reader.pop_front().is_some() {}
            });
        }

        for _ in 0..ELEMENTS {
            writer.push_back(PAYLOAD);
        }
    });
}

#[test]
fn shared_reader_never_double_delivers() {
    loom::model(|| {
        for &t in &THREADS {
            push_pop_shared(t);
        }
    });
}

/// S5: two independent readers forked from the same cursor each observe the
/// same published message.
#[test]
fn forked_readers_observe_independently() {
    loom::model(|| {
        let buf = RingBuffer::<8, BUF_LEN>::new();
        let writer = buf.try_lock().unwrap();
        let r1 = buf.reader();

        writer.push_back(PAYLOAD);
        let r2 = r1.fork();

        loom::thread::scope(|scope| {
            let r1 = &r1;
            let r2 = &r2;
            scope.spawn(move || {
                assert_eq!(r1.pop_front(), Some(PAYLOAD));
            });
            scope.spawn(move || {
                assert_eq!(r2.pop_front(), Some(PAYLOAD));
            });
        });
    });
}
