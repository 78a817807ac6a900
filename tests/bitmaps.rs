use a2print::bitmap::{chunk_heights, from_source, with_dimensions, CHUNK_HEADER};
use a2print::{Error, RasterChunk, MAX_DOTS_PER_LINE};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn rows(width: u16, height: u16) -> Vec<u8> {
    (0..(width as usize / 8 * height as usize))
        .map(|x| x as u8)
        .collect()
}

fn chunks(width: u16, height: u16, data: &[u8]) -> Vec<RasterChunk> {
    with_dimensions(width, height, data)
        .unwrap()
        .chunks(MAX_DOTS_PER_LINE)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
pub fn test_single_chunk_wire_bytes() {
    // 16 dots wide, 3 rows
    let data = rows(16, 3);
    let bytes = with_dimensions(16, 3, data.as_slice())
        .unwrap()
        .to_bytes(MAX_DOTS_PER_LINE)
        .unwrap();

    assert_eq!(bytes, vec![18, 42, 3, 2, 0, 1, 2, 3, 4, 5]);
}

#[test]
pub fn test_chunk_boundaries() {
    for (height, expected) in [
        (0u16, vec![]),
        (1, vec![1u8]),
        (255, vec![255]),
        (256, vec![255, 1]),
        (510, vec![255, 255]),
        (600, vec![255, 255, 90]),
    ] {
        let data = rows(8, height);
        let heights = chunks(8, height, &data)
            .iter()
            .map(|c| c.height)
            .collect::<Vec<_>>();
        assert_eq!(heights, expected, "height {}", height);
    }
}

#[test]
pub fn test_zero_height_pulls_nothing() {
    let mut data: &[u8] = &[7, 7];
    let bitmap = with_dimensions(384, 0, &mut data).unwrap();
    assert_eq!(bitmap.to_bytes(MAX_DOTS_PER_LINE).unwrap(), Vec::<u8>::new());
    assert_eq!(data, &[7, 7]);
}

#[test]
pub fn test_source_not_read_past_bitmap() {
    let mut data: &[u8] = &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE];
    let bytes = with_dimensions(16, 2, &mut data)
        .unwrap()
        .to_bytes(MAX_DOTS_PER_LINE)
        .unwrap();
    assert_eq!(bytes, vec![18, 42, 2, 2, 0xAA, 0xBB, 0xCC, 0xDD]);
    assert_eq!(data, &[0xEE]);
}

#[test]
pub fn test_self_describing_stream() {
    let mut stream = vec![0x10, 0x00, 0x02, 0x00];
    stream.extend_from_slice(&[0xF0, 0x0F, 0xFF, 0x00]);

    let bitmap = from_source(stream.as_slice()).unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (16, 2));
    assert_eq!(
        bitmap.to_bytes(MAX_DOTS_PER_LINE).unwrap(),
        vec![18, 42, 2, 2, 0xF0, 0x0F, 0xFF, 0x00]
    );
}

#[test]
pub fn test_truncated_payload() {
    let data = rows(384, 1);
    let bitmap = with_dimensions(384, 2, data.as_slice()).unwrap();
    match bitmap.to_bytes(MAX_DOTS_PER_LINE) {
        Err(Error::SourceExhausted { expected, read }) => {
            assert_eq!(expected, 96);
            assert_eq!(read, 48);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
pub fn test_too_wide() {
    let data = rows(392, 2);
    let bitmap = with_dimensions(392, 2, data.as_slice()).unwrap();
    assert!(matches!(
        bitmap.to_bytes(MAX_DOTS_PER_LINE),
        Err(Error::BitmapTooWide {
            width: 392,
            max: 384
        })
    ));
}

proptest! {
    #[test]
    fn prop_chunking_is_lossless(
        width_bytes in 1u16..=48,
        height in 0u16..=800,
        seed in any::<u8>(),
    ) {
        let width = width_bytes * 8;
        let data = (0..(width_bytes as usize * height as usize))
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect::<Vec<u8>>();

        let chunks = chunks(width, height, &data);

        let payload = chunks.iter().flat_map(|c| c.payload.iter().copied()).collect::<Vec<_>>();
        prop_assert_eq!(payload, data);

        let total: usize = chunks.iter().map(|c| c.height as usize).sum();
        prop_assert_eq!(total, height as usize);
        for c in &chunks {
            prop_assert!(c.height >= 1);
            prop_assert_eq!(c.row_width as u16, width_bytes);
            let header = c.header();
            prop_assert_eq!([header[0], header[1]], CHUNK_HEADER);
        }
    }

    #[test]
    fn prop_heights_cover_height(height in any::<u16>()) {
        let heights = chunk_heights(height).collect::<Vec<_>>();
        prop_assert_eq!(heights.iter().map(|h| *h as usize).sum::<usize>(), height as usize);
        prop_assert!(heights.iter().all(|h| *h > 0));
        if let Some((last, rest)) = heights.split_last() {
            prop_assert!(rest.iter().all(|h| *h == 255));
            prop_assert!(*last > 0);
        }
    }
}
