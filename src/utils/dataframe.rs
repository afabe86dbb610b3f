use crate::types::{EmitterPopulation, EmitterState, StateTrajectories};
use ndarray::{Array2, Array3, Axis};
use polars::prelude::*;

/// One row per emitter: position, then `state_f{k}` codes (1 on, 0 off,
/// -1 bleached) and `num_photons_f{k}` for every frame.
pub fn emitter_table(
    population: &EmitterPopulation,
    trajectories: &StateTrajectories,
    photon_counts: &Array2<u32>,
) -> Result<DataFrame, PolarsError> {
    let emitters = &population.emitters;
    let ids: Vec<u64> = emitters.iter().map(|e| e.index as u64).collect();
    let xs: Vec<f64> = emitters.iter().map(|e| e.x_nm).collect();
    let ys: Vec<f64> = emitters.iter().map(|e| e.y_nm).collect();

    let mut columns: Vec<Column> = vec![
        Series::new("emitter".into(), &ids).into(),
        Series::new("x_nm".into(), &xs).into(),
        Series::new("y_nm".into(), &ys).into(),
    ];

    for frame in 0..trajectories.nframes() {
        let codes: Vec<i32> = trajectories
            .frame(frame)
            .iter()
            .map(|s| s.code() as i32)
            .collect();
        columns.push(Series::new(format!("state_f{}", frame).into(), &codes).into());
    }
    for (frame, counts) in photon_counts.axis_iter(Axis(1)).enumerate() {
        let counts: Vec<u32> = counts.to_vec();
        columns.push(Series::new(format!("num_photons_f{}", frame).into(), &counts).into());
    }

    DataFrame::new(columns)
}

/// One row per frame: emitters ON, photons emitted and photons kept on the
/// detector grid.
pub fn frame_table(
    trajectories: &StateTrajectories,
    photon_counts: &Array2<u32>,
    histograms: &Array3<u32>,
) -> Result<DataFrame, PolarsError> {
    let nframes = photon_counts.ncols();
    if trajectories.nframes() != nframes {
        return Err(PolarsError::ShapeMismatch(
            format!(
                "{} frames of photon counts but {} frames of states",
                nframes,
                trajectories.nframes()
            )
            .into(),
        ));
    }
    if histograms.len_of(Axis(0)) != nframes {
        return Err(PolarsError::ShapeMismatch(
            format!(
                "{} frames of photon counts but {} histograms",
                nframes,
                histograms.len_of(Axis(0))
            )
            .into(),
        ));
    }

    let frames: Vec<u32> = (0..nframes as u32).collect();
    let active: Vec<u32> = (0..nframes)
        .map(|frame| trajectories.count_in_frame(frame, EmitterState::On) as u32)
        .collect();
    let emitted: Vec<u64> = photon_counts
        .axis_iter(Axis(1))
        .map(|c| c.iter().map(|&n| n as u64).sum())
        .collect();
    let detected: Vec<u64> = histograms
        .axis_iter(Axis(0))
        .map(|h| h.iter().map(|&n| n as u64).sum())
        .collect();

    DataFrame::new(vec![
        Series::new("frame".into(), &frames).into(),
        Series::new("active_emitters".into(), &active).into(),
        Series::new("emitted_photons".into(), &emitted).into(),
        Series::new("detected_photons".into(), &detected).into(),
    ])
}

/// Emitters that are ON in `frame`
pub fn on_emitters(df: &DataFrame, frame: usize) -> Result<LazyFrame, PolarsError> {
    let column = format!("state_f{}", frame);
    // Fail early on frames the table does not have
    df.column(&column)?;
    Ok(df.clone().lazy().filter(col(column.as_str()).eq(lit(1))))
}
