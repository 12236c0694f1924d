//! PNG decoding to normalized RGBA8 rows.
//!
//! Codec state (the `png` reader and the underlying file) lives in locals, so
//! every early return drops it. Row buffers are only handed to a
//! [`RasterImage`] once every row has been filled.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;

use super::normalize::{expand_line, GammaTable, SampleLayout};
use super::types::{DecodeOptions, HeaderInfo};
use crate::error::{FormatError, LoadError};
use crate::raster::{row_bytes, ImageFormat, RasterImage};

/// The fixed 8-byte PNG signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Check whether `header` starts with the PNG signature.
pub fn is_png(header: &[u8]) -> bool {
    header.len() >= PNG_SIGNATURE.len() && header[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
}

/// Read header metadata from a file without decoding pixel data.
///
/// # Errors
///
/// Returns `LoadError::File` if the path cannot be opened or read.
/// Returns `LoadError::Format` if the signature or header is invalid.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn inspect_header(path: impl AsRef<Path>) -> Result<HeaderInfo, LoadError> {
    let path = path.as_ref();
    let file = open(path)?;
    read_header(BufReader::new(file)).map_err(|e| attach_path(e, path))
}

/// Read `(width, height)` from a PNG file without decoding pixel data.
pub fn inspect(path: impl AsRef<Path>) -> Result<(u32, u32), LoadError> {
    inspect_header(path).map(|info| info.dimensions())
}

/// Read header metadata from any byte stream.
///
/// # Errors
///
/// Returns `LoadError::Format` if the signature or header is invalid, or if
/// the stream cannot be read.
pub fn inspect_reader<R: Read>(reader: R) -> Result<HeaderInfo, LoadError> {
    read_header(reader).map_err(stream_error)
}

fn read_header<R: Read>(reader: R) -> Result<HeaderInfo, LoadError> {
    let reader = start_decoder(reader, png::Transformations::IDENTITY)?;
    let info = header_info(reader.info());
    tracing::debug!(?info, "read PNG header");
    Ok(info)
}

/// Decode a PNG file into an RGBA8 raster.
///
/// # Errors
///
/// Returns `LoadError::File` if the path cannot be opened or read.
/// Returns `LoadError::Format` for a bad signature, a codec failure, or a
/// limit violation. No partially filled raster is ever returned.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn decode_png(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<RasterImage, LoadError> {
    let path = path.as_ref();
    let file = open(path)?;
    decode_stream(BufReader::new(file), options).map_err(|e| attach_path(e, path))
}

/// Decode a PNG byte stream into an RGBA8 raster.
///
/// # Errors
///
/// Returns `LoadError::Format` for a bad signature, a codec failure, a limit
/// violation, or a stream that cannot be read. No partially filled raster is
/// ever returned.
pub fn decode_png_from_reader<R: Read>(
    reader: R,
    options: &DecodeOptions,
) -> Result<RasterImage, LoadError> {
    decode_stream(reader, options).map_err(stream_error)
}

fn decode_stream<R: Read>(reader: R, options: &DecodeOptions) -> Result<RasterImage, LoadError> {
    let mut reader = start_decoder(
        reader,
        png::Transformations::EXPAND | png::Transformations::STRIP_16,
    )?;

    let header = header_info(reader.info());
    tracing::debug!(
        width = header.width,
        height = header.height,
        color_model = ?header.color_model,
        bit_depth = header.bit_depth,
        passes = header.passes(),
        gamma = ?header.gamma,
        "decoding PNG"
    );
    options.limits.check(header.width, header.height)?;

    let gamma = header
        .gamma
        .filter(|_| options.apply_gamma)
        .and_then(|g| GammaTable::new(g, options.display_gamma));
    if gamma.is_some() {
        tracing::debug!(display_gamma = options.display_gamma, "applying gamma remap");
    }

    let (color, depth) = reader.output_color_type();
    let layout = SampleLayout::from_output(color, depth)?;

    // The codec deinterlaces internally, so one frame is the whole image
    let mut frame = vec![0u8; reader.output_buffer_size()];
    let output = reader.next_frame(&mut frame).map_err(FormatError::from)?;
    reader.finish().map_err(FormatError::from)?;

    let width = output.width;
    let height = output.height;
    let line_size = output.line_size;
    let src_line = width as usize * layout.channels();
    if line_size < src_line || frame.len() < line_size * height as usize {
        return Err(FormatError::Codec(format!(
            "frame of {} bytes too small for {width}x{height}",
            frame.len()
        ))
        .into());
    }

    let mut rows = Vec::with_capacity(height as usize);
    for line in frame.chunks_exact(line_size).take(height as usize) {
        let mut row = vec![0u8; row_bytes(width)];
        expand_line(layout, &line[..src_line], &mut row);
        if let Some(table) = &gamma {
            table.apply_rgba(&mut row);
        }
        rows.push(row);
    }

    Ok(RasterImage::from_rows(ImageFormat::Png, width, height, rows))
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|e| LoadError::file(path, e))
}

/// Verify the signature, then hand the full stream to the codec and read
/// everything up to the first image data chunk.
fn start_decoder<R: Read>(
    mut reader: R,
    transformations: png::Transformations,
) -> Result<png::Reader<io::Chain<Cursor<[u8; 8]>, R>>, LoadError> {
    let mut signature = [0u8; 8];
    match reader.read_exact(&mut signature) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(FormatError::Signature.into());
        }
        Err(e) => return Err(LoadError::file("", e)),
    }
    if !is_png(&signature) {
        return Err(FormatError::Signature.into());
    }

    let mut decoder = png::Decoder::new(Cursor::new(signature).chain(reader));
    decoder.set_transformations(transformations);
    let reader = decoder.read_info().map_err(FormatError::from)?;
    Ok(reader)
}

fn header_info(info: &png::Info<'_>) -> HeaderInfo {
    HeaderInfo {
        width: info.width,
        height: info.height,
        color_model: info.color_type.into(),
        bit_depth: info.bit_depth as u8,
        interlaced: info.interlaced,
        gamma: info.source_gamma.map(|g| f64::from(g.into_value())),
        has_transparency: info.trns.is_some(),
    }
}

/// Streams have no path to report, so read failures count as format errors.
fn stream_error(err: LoadError) -> LoadError {
    match err {
        LoadError::File { source, .. } => {
            FormatError::Codec(format!("stream read failed: {source}")).into()
        }
        other => other,
    }
}

fn attach_path(err: LoadError, path: &Path) -> LoadError {
    match err {
        LoadError::File { source, .. } => LoadError::file(path, source),
        other => other,
    }
}
