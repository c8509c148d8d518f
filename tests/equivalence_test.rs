// Property tests: random operation scripts applied to both buffer kinds and
// to a plain Vec model must agree on lengths, cursors and contents

use poolbuf::{ArrayPool, Buffer, BufferConfig, BufferPools, ChunkedBuffer, ResizingBuffer};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Write { length: usize, seed: u8 },
    Read { length: usize },
    Seek { position: u64 },
    SetLen { length: u64 },
    Export { length: usize },
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..20_000usize, any::<u8>()).prop_map(|(length, seed)| Op::Write { length, seed }),
        3 => (0..20_000usize).prop_map(|length| Op::Read { length }),
        3 => (0..80_000u64).prop_map(|position| Op::Seek { position }),
        2 => (0..80_000u64).prop_map(|length| Op::SetLen { length }),
        1 => (0..80_000usize).prop_map(|length| Op::Export { length }),
        1 => Just(Op::Clear),
    ]
}

fn scripts() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op(), 1..40)
}

fn payload(length: usize, seed: u8) -> Vec<u8> {
    (0..length).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}

/// Reference model. Items exposed by growing the length have unspecified
/// contents, so they are tracked as `None` and never compared.
#[derive(Default)]
struct Model {
    data: Vec<Option<u8>>,
    position: usize,
}

impl Model {
    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Write { length, seed } => {
                let end = self.position + length;
                if end > self.data.len() {
                    self.data.resize(end, None);
                }
                for (slot, byte) in self.data[self.position..end]
                    .iter_mut()
                    .zip(payload(length, seed))
                {
                    *slot = Some(byte);
                }
                self.position = end;
            }
            Op::Read { length } => {
                self.position += length.min(self.data.len() - self.position);
            }
            Op::Seek { position } => {
                self.position = (position as usize).min(self.data.len());
            }
            Op::SetLen { length } => {
                self.data.resize(length as usize, None);
                self.position = self.position.min(self.data.len());
            }
            Op::Export { .. } => {}
            Op::Clear => {
                self.data.clear();
                self.position = 0;
            }
        }
    }

    fn matches(&self, actual: &[u8]) -> bool {
        actual.len() == self.data.len()
            && self
                .data
                .iter()
                .zip(actual)
                .all(|(expected, byte)| expected.is_none_or(|e| e == *byte))
    }
}

fn run<B: Buffer<u8>>(buffer: &mut B, script: &[Op]) -> Result<(), TestCaseError> {
    let mut model = Model::default();

    for (step, op) in script.iter().enumerate() {
        let before = model.position;
        model.apply(op);

        match *op {
            Op::Write { length, seed } => {
                let written = buffer.write(&payload(length, seed)).map_err(|e| {
                    TestCaseError::fail(format!("step {}: write failed: {}", step, e))
                })?;
                prop_assert_eq!(written, length);
            }
            Op::Read { length } => {
                let mut target = vec![0u8; length];
                let read = buffer.read(&mut target);
                prop_assert_eq!(read, model.position - before, "step {}", step);
                let expected = &model.data[before..model.position];
                for (index, (byte, expected)) in target.iter().zip(expected).enumerate() {
                    if let Some(expected) = expected {
                        prop_assert_eq!(*byte, *expected, "step {} offset {}", step, index);
                    }
                }
            }
            Op::Seek { position } => {
                let actual = buffer.set_position(position).map_err(|e| {
                    TestCaseError::fail(format!("step {}: seek failed: {}", step, e))
                })?;
                prop_assert_eq!(actual, model.position as u64);
            }
            Op::SetLen { length } => {
                buffer.set_len(length).map_err(|e| {
                    TestCaseError::fail(format!("step {}: set_len failed: {}", step, e))
                })?;
            }
            Op::Export { length } => {
                let mut target = vec![0u8; length];
                let exported = buffer.export_to(&mut target);
                prop_assert_eq!(exported, length.min(model.data.len()));
            }
            Op::Clear => buffer.clear(),
        }

        prop_assert_eq!(buffer.len(), model.data.len() as u64, "step {}", step);
        prop_assert_eq!(buffer.position(), model.position as u64, "step {}", step);
        prop_assert!(buffer.capacity() >= buffer.len(), "step {}", step);
    }

    prop_assert!(model.matches(&buffer.to_vec()));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_resizing_buffer_matches_model(script in scripts()) {
        let mut buffer = ResizingBuffer::with_pool(ArrayPool::new());
        run(&mut buffer, &script)?;
    }

    #[test]
    fn prop_chunked_buffer_matches_model(script in scripts()) {
        let config = BufferConfig::new(4096, 1024, 4096).unwrap();
        let mut buffer = ChunkedBuffer::with_pools(BufferPools::new(), config).unwrap();
        run(&mut buffer, &script)?;
    }

    #[test]
    fn prop_chunk_mode_buffer_matches_model(script in scripts()) {
        let config = BufferConfig::new(4096, 1024, 2048).unwrap().with_chunk_mode(true);
        let mut buffer = ChunkedBuffer::with_pools(BufferPools::new(), config).unwrap();
        run(&mut buffer, &script)?;
    }

    #[test]
    fn prop_buffers_agree_on_written_data(script in scripts()) {
        let mut resizing = ResizingBuffer::with_pool(ArrayPool::new());
        let mut chunked = ChunkedBuffer::with_pools(BufferPools::new(), BufferConfig::default()).unwrap();
        run(&mut resizing, &script)?;
        run(&mut chunked, &script)?;
        prop_assert_eq!(resizing.len(), chunked.len());
        prop_assert_eq!(resizing.position(), chunked.position());
    }
}
