use crate::error::Result;
use crate::types::ImageStack;
use ndarray::Axis;
use polars::prelude::DataFrame;
use polars_io::prelude::ParquetWriter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tiff::encoder::{TiffEncoder, colortype};
use tracing::info;

/// Write the stack as a multi-page 32-bit float TIFF, one page per frame.
///
/// Page rows follow axis 1 of the stack and columns axis 2.
pub fn write_stack_tiff(stack: &ImageStack, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (nframes, height, width) = stack.shape();

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut encoder = TiffEncoder::new(&mut writer)?;

    for frame in stack.data.axis_iter(Axis(0)) {
        let data: Vec<f32> = frame.iter().map(|&v| v as f32).collect();
        encoder.write_image::<colortype::Gray32Float>(width as u32, height as u32, &data)?;
    }
    drop(encoder);
    writer.flush()?;

    info!(path = %path.display(), nframes, width, height, "wrote image stack");
    Ok(())
}

/// Write a table to a parquet file
pub fn write_table_parquet(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let mut file = File::create(path.as_ref())?;
    ParquetWriter::new(&mut file).finish(df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use polars::prelude::*;
    use tiff::decoder::{Decoder, DecodingResult};

    #[test]
    fn test_tiff_has_one_page_per_frame() {
        let stack = ImageStack {
            data: Array3::from_shape_fn((3, 4, 5), |(f, i, j)| (f * 100 + i * 5 + j) as f64 + 0.5),
            noise: 0.0,
            background: 0.5,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.tiff");
        write_stack_tiff(&stack, &path).unwrap();

        let mut decoder = Decoder::new(File::open(&path).unwrap()).unwrap();
        let mut pages = 1;
        assert_eq!(decoder.dimensions().unwrap(), (5, 4));
        match decoder.read_image().unwrap() {
            DecodingResult::F32(data) => {
                assert_eq!(data.len(), 20);
                assert_eq!(data[6], 6.5);
            }
            _ => panic!("expected a float image"),
        }
        while decoder.more_images() {
            decoder.next_image().unwrap();
            pages += 1;
        }
        assert_eq!(pages, 3);
    }

    #[test]
    fn test_parquet_written() {
        let mut df = DataFrame::new(vec![Series::new("frame".into(), &[0u32, 1, 2]).into()]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.parquet");
        write_table_parquet(&mut df, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
