use super::*;

fn count(frame: &FrameRGBA, pred: impl Fn([u8; 4]) -> bool) -> usize {
    frame
        .data
        .chunks_exact(4)
        .filter(|px| pred([px[0], px[1], px[2], px[3]]))
        .count()
}

#[test]
fn reference_curves_match_their_formulas() {
    let plot = reference_decay_plot(20);
    assert_eq!(plot.series.len(), 2);
    assert_eq!(plot.asymptote, Some(0.1));

    let zero = &plot.series[0].values;
    let constant = &plot.series[1].values;
    assert_eq!(zero.len(), 20);
    assert!((zero[0] - (-0.3f64).exp()).abs() < 1e-15);
    assert!((constant[19] - ((-4.0f64).exp() + 0.1)).abs() < 1e-15);
    assert!(zero.windows(2).all(|w| w[1] < w[0]));
    assert!(constant.iter().all(|&v| v > 0.1));
}

#[test]
fn validate_rejects_empty_inputs() {
    assert!(matches!(
        DecayPlot::default().validate(),
        Err(ModevizError::EmptySeries(_))
    ));
    let plot = DecayPlot {
        series: vec![DecaySeries {
            label: "pod".into(),
            values: vec![],
            color: Rgba8::rgb(0, 0, 0),
            marker: Marker::Circle,
        }],
        asymptote: None,
    };
    assert!(matches!(plot.validate(), Err(ModevizError::EmptySeries(l)) if l == "pod"));
}

#[test]
fn renders_both_series_colors() {
    let style = PlotStyle::default();
    let frame = render_decay(&reference_decay_plot(20), &style).unwrap();
    assert_eq!((frame.width, frame.height), (800, 600));

    let blue = count(&frame, |px| px[2] > 150 && px[0] < 80 && px[1] < 150);
    let red = count(&frame, |px| px[0] > 190 && px[1] < 80 && px[2] < 80);
    assert!(blue > 100, "blue pixels: {blue}");
    assert!(red > 100, "red pixels: {red}");
}

#[test]
fn single_point_series_still_renders() {
    let plot = DecayPlot {
        series: vec![DecaySeries {
            label: "one".into(),
            values: vec![2.0],
            color: Rgba8::rgb(0, 160, 0),
            marker: Marker::Square,
        }],
        asymptote: None,
    };
    let frame = render_decay(&plot, &PlotStyle::default()).unwrap();
    assert!(count(&frame, |px| px[1] > 140 && px[0] < 40 && px[2] < 40) > 20);
}
