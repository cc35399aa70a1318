use crate::error::{Error, Result};
use crate::layer::EncodedLayer;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

//===========================================================================//

// The size of the ICONDIR header, in bytes.
pub(crate) const ICONDIR_LEN: u32 = 6;

// The size of each ICONDIRENTRY struct, in bytes.
pub(crate) const ICONDIRENTRY_LEN: u32 = 16;

// The ICONDIR resource type for icons (cursors would be 2).
const RESOURCE_TYPE_ICON: u16 = 1;

//===========================================================================//

/// Returns the total size of an ICO file holding `layers`.
pub(crate) fn file_size(layers: &[EncodedLayer]) -> u64 {
    let payloads: u64 = layers.iter().map(|layer| layer.size() as u64).sum();
    ICONDIR_LEN as u64 + ICONDIRENTRY_LEN as u64 * layers.len() as u64 + payloads
}

/// Returns the file offset of each layer's payload, in order.
pub(crate) fn payload_offsets(layers: &[EncodedLayer]) -> Vec<u32> {
    let mut data_offset = ICONDIR_LEN + ICONDIRENTRY_LEN * (layers.len() as u32);
    layers
        .iter()
        .map(|layer| {
            let offset = data_offset;
            data_offset += layer.size();
            offset
        })
        .collect()
}

// Offsets and sizes are 32-bit, so the whole file must fit in 4 GiB.
fn check_file_size(size: u64) -> Result<()> {
    if size > u32::MAX as u64 {
        return Err(Error::FileTooLarge(size));
    }
    Ok(())
}

/// Writes an ICO file containing `layers`, in order.
pub(crate) fn write_icon_file<W: Write>(
    layers: &[EncodedLayer],
    mut writer: W,
) -> Result<()> {
    if layers.is_empty() {
        return Err(Error::NoLayers);
    }
    if layers.len() > (u16::MAX as usize) {
        return Err(Error::TooManyLayers(layers.len()));
    }
    check_file_size(file_size(layers))?;
    writer.write_u16::<LittleEndian>(0)?; // reserved
    writer.write_u16::<LittleEndian>(RESOURCE_TYPE_ICON)?;
    writer.write_u16::<LittleEndian>(layers.len() as u16)?;
    let offsets = payload_offsets(layers);
    for (layer, &data_offset) in layers.iter().zip(offsets.iter()) {
        // A width/height byte of zero indicates a size of 256 or more.
        let width = if layer.width() > 255 { 0 } else { layer.width() as u8 };
        writer.write_u8(width)?;
        let height =
            if layer.height() > 255 { 0 } else { layer.height() as u8 };
        writer.write_u8(height)?;
        writer.write_u8(layer.num_colors())?;
        writer.write_u8(0)?; // reserved
        writer.write_u16::<LittleEndian>(1)?; // color planes
        writer.write_u16::<LittleEndian>(layer.bits_per_pixel())?;
        writer.write_u32::<LittleEndian>(layer.size())?;
        writer.write_u32::<LittleEndian>(data_offset)?;
    }
    for layer in layers.iter() {
        writer.write_all(layer.data())?;
    }
    Ok(())
}

//===========================================================================//


//===========================================================================//
