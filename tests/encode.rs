extern crate favico;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use favico::{Color, IconAssembler, IconSize, Raster};
use std::io::Cursor;

//===========================================================================//

struct DirEntry {
    width: u8,
    height: u8,
    num_colors: u8,
    planes: u16,
    bits_per_pixel: u16,
    size: u32,
    offset: u32,
}

fn read_directory(data: &[u8]) -> Vec<DirEntry> {
    let mut reader = Cursor::new(data);
    assert_eq!(reader.read_u16::<LittleEndian>().unwrap(), 0);
    assert_eq!(reader.read_u16::<LittleEndian>().unwrap(), 1);
    let count = reader.read_u16::<LittleEndian>().unwrap();
    let mut entries = Vec::new();
    for _ in 0..count {
        let width = reader.read_u8().unwrap();
        let height = reader.read_u8().unwrap();
        let num_colors = reader.read_u8().unwrap();
        assert_eq!(reader.read_u8().unwrap(), 0);
        entries.push(DirEntry {
            width,
            height,
            num_colors,
            planes: reader.read_u16::<LittleEndian>().unwrap(),
            bits_per_pixel: reader.read_u16::<LittleEndian>().unwrap(),
            size: reader.read_u32::<LittleEndian>().unwrap(),
            offset: reader.read_u32::<LittleEndian>().unwrap(),
        });
    }
    entries
}

fn single_layer(raster: &Raster) -> Vec<u8> {
    let mut icon = IconAssembler::new();
    assert!(icon.add(raster, &[]));
    icon.to_bytes().unwrap()
}

//===========================================================================//

#[test]
fn opaque_16x16_file_layout() {
    let raster = Raster::filled(16, 16, Color::opaque(10, 20, 30));
    let data = single_layer(&raster);
    assert_eq!(data.len(), 1150);
    assert_eq!(&data[..6], b"\x00\x00\x01\x00\x01\x00");
    let entries = read_directory(&data);
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!((entry.width, entry.height), (16, 16));
    assert_eq!(entry.num_colors, 0);
    assert_eq!(entry.planes, 1);
    assert_eq!(entry.bits_per_pixel, 32);
    assert_eq!(entry.size, 1128);
    assert_eq!(entry.offset, 22);
    // Every color word is 0xff0a141e, stored little-endian.
    for pixel in data[62..62 + 1024].chunks(4) {
        assert_eq!(pixel, b"\x1e\x14\x0a\xff");
    }
    // The mask is all zeros: one 4-byte word per row.
    assert!(data[62 + 1024..].iter().all(|&byte| byte == 0));
    assert_eq!(data.len() - (62 + 1024), 16 * 4);
}

#[test]
fn bitmap_header_doubles_height() {
    let raster = Raster::filled(3, 5, Color::opaque(0, 0, 0));
    let data = single_layer(&raster);
    let mut reader = Cursor::new(&data[22..]);
    assert_eq!(reader.read_u32::<LittleEndian>().unwrap(), 40);
    assert_eq!(reader.read_i32::<LittleEndian>().unwrap(), 3);
    assert_eq!(reader.read_i32::<LittleEndian>().unwrap(), 10);
    assert_eq!(reader.read_u16::<LittleEndian>().unwrap(), 1);
    assert_eq!(reader.read_u16::<LittleEndian>().unwrap(), 32);
    for _ in 0..6 {
        assert_eq!(reader.read_u32::<LittleEndian>().unwrap(), 0);
    }
}

#[test]
fn mask_row_bytes_are_word_aligned() {
    for &(width, row_bytes) in &[(16u32, 4usize), (32, 4), (33, 8), (1, 4)] {
        let raster = Raster::filled(width, 3, Color::opaque(1, 1, 1));
        let data = single_layer(&raster);
        let mask_len = data.len() - 22 - 40 - (width as usize) * 3 * 4;
        assert_eq!(mask_len, row_bytes * 3, "width {}", width);
    }
}

#[test]
fn size_256_is_stored_as_zero() {
    let raster = Raster::filled(256, 256, Color::opaque(0, 0, 0));
    let data = single_layer(&raster);
    let entries = read_directory(&data);
    assert_eq!(entries[0].width, 0);
    assert_eq!(entries[0].height, 0);
}

#[test]
fn alpha_extremes_map_to_mask_bits() {
    // Top row: transparent, opaque.  Bottom row: opaque, opaque.
    let raster = Raster::from_pixels(
        2,
        2,
        vec![
            Color::new(50, 60, 70, 127),
            Color::new(50, 60, 70, 0),
            Color::opaque(0, 0, 0),
            Color::opaque(0, 0, 0),
        ],
    );
    let data = single_layer(&raster);
    let colors = &data[62..62 + 16];
    // The bottom row comes first, so the top-left pixel is the third word.
    assert_eq!(colors[8 + 3], 0);
    assert_eq!(colors[12 + 3], 255);
    let mut mask = Cursor::new(&data[62 + 16..]);
    // Mask words are big-endian, so the first pixel is the top bit.
    assert_eq!(mask.read_u32::<BigEndian>().unwrap(), 0);
    assert_eq!(mask.read_u32::<BigEndian>().unwrap(), 0x8000_0000);
}

#[test]
fn color_and_mask_use_opposite_byte_orders() {
    let mut pixels = vec![Color::opaque(0x11, 0x22, 0x33); 8];
    pixels[0] = Color::TRANSPARENT;
    let raster = Raster::from_pixels(8, 1, pixels);
    let data = single_layer(&raster);
    // Color word 0xff112233 is written little-endian...
    assert_eq!(&data[62 + 4..62 + 8], b"\x33\x22\x11\xff");
    // ...while mask word 0x80000000 is written big-endian.
    assert_eq!(&data[62 + 32..], b"\x80\x00\x00\x00");
}

#[test]
fn three_sizes_have_contiguous_offsets() {
    let raster = Raster::filled(64, 64, Color::opaque(200, 0, 0));
    let mut icon = IconAssembler::new();
    for &side in &[16, 24, 32] {
        assert!(icon.add(&raster, &[IconSize::square(side)]));
    }
    let data = icon.to_bytes().unwrap();
    let entries = read_directory(&data);
    let widths: Vec<u8> = entries.iter().map(|e| e.width).collect();
    assert_eq!(widths, vec![16, 24, 32]);
    let mut expected_offset = 6 + 3 * 16;
    for entry in entries.iter() {
        assert_eq!(entry.offset, expected_offset);
        expected_offset += entry.size;
    }
    assert_eq!(expected_offset as usize, data.len());
}

#[test]
fn same_raster_encodes_identically() {
    let raster = Raster::filled(24, 24, Color::new(1, 2, 3, 30));
    let mut icon = IconAssembler::new();
    assert!(icon.add(&raster, &[IconSize::square(24), IconSize::square(24)]));
    let layers = icon.layers();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].data(), layers[1].data());
}

#[test]
fn default_sizes_are_16_24_32() {
    let raster = Raster::filled(48, 48, Color::opaque(0, 0, 0));
    let mut icon = IconAssembler::new();
    assert!(icon.add_default_sizes(&raster));
    let sizes: Vec<(u32, u32)> =
        icon.layers().iter().map(|l| (l.width(), l.height())).collect();
    assert_eq!(sizes, vec![(16, 16), (24, 24), (32, 32)]);
}

//===========================================================================//
