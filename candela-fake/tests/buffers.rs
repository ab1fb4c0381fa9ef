use candela::buffer::{Buffer, BufferError, Usage};
use candela_fake::FakeContext;

#[test]
fn zero_sized_allocations_are_rejected() {
  let mut ctx = FakeContext::new("buffers");
  let result = Buffer::<_, f32>::new(&mut ctx, Usage::StaticDraw, 0);

  assert_eq!(result.err(), Some(BufferError::ZeroSized));
}

#[test]
fn new_buffers_start_zeroed() {
  let mut ctx = FakeContext::new("buffers");
  let buffer = Buffer::<_, u32>::new(&mut ctx, Usage::StaticRead, 3).unwrap();

  assert_eq!(buffer.len(), 3);
  assert_eq!(buffer.read().unwrap(), vec![0, 0, 0]);
}

#[test]
fn uploads_round_trip() {
  let mut ctx = FakeContext::new("buffers");
  let mut buffer = Buffer::from_slice(&mut ctx, Usage::StaticDraw, &[1u32, 2, 3, 4]).unwrap();

  assert_eq!(buffer.read().unwrap(), vec![1, 2, 3, 4]);

  buffer.upload(&[5, 6, 7, 8]).unwrap();
  assert_eq!(buffer.read().unwrap(), vec![5, 6, 7, 8]);
}

#[test]
fn partial_uploads_land_at_their_offset() {
  let mut ctx = FakeContext::new("buffers");
  let mut buffer = Buffer::from_slice(&mut ctx, Usage::DynamicDraw, &[0u8; 8]).unwrap();

  buffer.upload_part(3, &[1, 2, 3]).unwrap();

  assert_eq!(buffer.read().unwrap(), vec![0, 0, 0, 1, 2, 3, 0, 0]);
}

#[test]
fn whole_uploads_must_match_the_length() {
  let mut ctx = FakeContext::new("buffers");
  let mut buffer = Buffer::<_, u16>::new(&mut ctx, Usage::StaticDraw, 4).unwrap();

  assert_eq!(
    buffer.upload(&[1, 2, 3]),
    Err(BufferError::TooFewValues {
      provided_len: 3,
      buffer_len: 4,
    })
  );

  assert_eq!(
    buffer.upload(&[1, 2, 3, 4, 5]),
    Err(BufferError::TooManyValues {
      provided_len: 5,
      buffer_len: 4,
    })
  );
}

#[test]
fn ranged_uploads_cannot_overflow() {
  let mut ctx = FakeContext::new("buffers");
  let mut buffer = Buffer::<_, u8>::new(&mut ctx, Usage::DynamicDraw, 4).unwrap();

  assert_eq!(
    buffer.upload_part(2, &[1, 2, 3]),
    Err(BufferError::Overflow {
      offset: 2,
      len: 3,
      buffer_len: 4,
    })
  );
}

#[test]
fn lengths_count_elements_not_bytes() {
  let mut ctx = FakeContext::new("buffers");
  let buffer = Buffer::<_, [f32; 4]>::new(&mut ctx, Usage::StaticDraw, 5).unwrap();

  assert_eq!(buffer.len(), 5);
  assert!(!buffer.is_empty());
  assert_eq!(buffer.usage(), Usage::StaticDraw);
}
