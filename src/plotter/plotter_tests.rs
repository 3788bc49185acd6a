#[cfg(test)]
mod tests {
    use crate::plotter::assembler::ChartData;
    use crate::plotter::error::{PlotError, RangeIssue, Result};
    use crate::plotter::input::{DomainInput, ExpressionList};
    use crate::plotter::renderer::{ChartHandle, ChartRenderer, SvgRenderer};
    use crate::plotter::session::PlotSession;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Rendered(usize),
        Destroyed(usize),
    }

    struct RecordedChart {
        serial: usize,
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl ChartHandle for RecordedChart {
        fn destroy(&mut self) {
            self.events.borrow_mut().push(Event::Destroyed(self.serial));
        }
    }

    /// Renderer double: remembers every chart it was asked to draw.
    #[derive(Default)]
    struct RecordingRenderer {
        rendered: Vec<ChartData>,
        events: Rc<RefCell<Vec<Event>>>,
        fail_with: Option<String>,
    }

    impl ChartRenderer for RecordingRenderer {
        type Chart = RecordedChart;

        fn render(&mut self, chart_data: &ChartData) -> Result<RecordedChart> {
            if let Some(message) = self.fail_with.take() {
                return Err(PlotError::Render(message));
            }
            self.rendered.push(chart_data.clone());
            let serial = self.rendered.len();
            self.events.borrow_mut().push(Event::Rendered(serial));
            Ok(RecordedChart {
                serial,
                events: self.events.clone(),
            })
        }
    }

    fn session(texts: &[&str], min_x: &str, max_x: &str, n: &str) -> PlotSession<RecordingRenderer> {
        PlotSession::with_inputs(
            RecordingRenderer::default(),
            ExpressionList::from_texts(texts.iter().copied()),
            DomainInput::new(min_x, max_x, n),
        )
    }

    #[test]
    fn test_square_scenario() {
        let mut s = session(&["x^2"], "-2", "2", "5");
        s.submit().unwrap();
        let data = s.chart_data().unwrap();
        assert_eq!(data.x_values, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(data.labels, vec!["-2.00", "-1.00", "0.00", "1.00", "2.00"]);
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].label, "y = x^2");
        assert_eq!(
            data.series[0].values,
            vec![Some(4.0), Some(1.0), Some(0.0), Some(1.0), Some(4.0)]
        );
        assert_eq!(data.series[0].point_radius, 0);
        assert!(s.error_message().is_none());
        assert!(s.chart().is_some());
    }

    #[test]
    fn test_log_scenario_has_gap() {
        let mut s = session(&["log(x)"], "-1", "1", "3");
        s.submit().unwrap();
        let values = &s.chart_data().unwrap().series[0].values;
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], None);
        assert!(values.iter().any(|v| v.is_none()));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let mut s = session(&["x", ""], "0", "1", "4");
        s.submit().unwrap();
        let data = s.chart_data().unwrap();
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].label, "y = x");
    }

    #[test]
    fn test_all_blank_creates_no_chart() {
        let mut s = session(&["", "  "], "0", "1", "4");
        assert_eq!(s.submit(), Err(PlotError::EmptyInput));
        assert_eq!(
            s.error_message().as_deref(),
            Some("Please enter at least one expression")
        );
        assert!(s.chart().is_none());
        assert!(s.renderer().rendered.is_empty());
    }

    #[test]
    fn test_two_samples_are_endpoints() {
        let mut s = session(&["3x + 1"], "-4.5", "7.25", "2");
        s.submit().unwrap();
        let data = s.chart_data().unwrap();
        assert_eq!(data.x_values, vec![-4.5, 7.25]);
        assert_relative_eq!(data.series[0].values[0].unwrap(), -12.5);
        assert_relative_eq!(data.series[0].values[1].unwrap(), 22.75);
    }

    #[test]
    fn test_evenly_spaced_points() {
        let mut s = session(&["cos(x)"], "-1", "2", "301");
        s.submit().unwrap();
        let x = &s.chart_data().unwrap().x_values;
        assert_eq!(x.len(), 301);
        assert_relative_eq!(x[0], -1.0);
        assert_relative_eq!(x[300], 2.0, epsilon = 1e-12);
        for pair in x.windows(2) {
            assert_relative_eq!(pair[1] - pair[0], 0.01, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_equal_bounds_rejected() {
        let mut s = session(&["x"], "1", "1", "10");
        assert_eq!(
            s.submit(),
            Err(PlotError::Range(RangeIssue::NotIncreasing))
        );
        assert!(s.chart().is_none());
    }

    #[test]
    fn test_plotting_twice_is_idempotent() {
        let mut s = session(&["x^3 - 2x", "sin(x)", "1/x"], "-3", "3", "61");
        s.submit().unwrap();
        s.submit().unwrap();
        let rendered = &s.renderer().rendered;
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0], rendered[1]);
    }

    #[test]
    fn test_previous_chart_destroyed_before_next_render() {
        let mut s = session(&["x"], "0", "1", "3");
        s.submit().unwrap();
        s.submit().unwrap();
        let events = s.renderer().events.borrow().clone();
        assert_eq!(
            events,
            vec![Event::Rendered(1), Event::Destroyed(1), Event::Rendered(2)]
        );
    }

    #[test]
    fn test_chart_destroyed_when_session_dropped() {
        let events;
        {
            let mut s = session(&["x"], "0", "1", "3");
            s.submit().unwrap();
            events = s.renderer().events.clone();
        }
        assert_eq!(
            *events.borrow(),
            vec![Event::Rendered(1), Event::Destroyed(1)]
        );
    }

    #[test]
    fn test_failure_keeps_previous_chart_and_sets_single_message() {
        let mut s = session(&["x"], "0", "1", "3");
        s.submit().unwrap();
        let id = s.expressions().entries()[0].id;
        s.set_expression(id, "sin(");
        assert!(matches!(s.submit(), Err(PlotError::Parse { .. })));
        let first = s.error_message().unwrap();
        assert!(first.starts_with("Error parsing expression \"sin(\""));
        assert!(s.chart().is_some());
        assert_eq!(s.chart_data().unwrap().series[0].label, "y = x");

        s.set_expression(id, "x + y");
        assert!(matches!(s.submit(), Err(PlotError::Eval { .. })));
        assert_eq!(
            s.error_message().as_deref(),
            Some("Error evaluating expression \"x + y\" at x = 0: Undefined symbol y")
        );

        s.set_expression(id, "x");
        s.submit().unwrap();
        assert!(s.error_message().is_none());
    }

    #[test]
    fn test_any_failing_expression_aborts_the_plot() {
        let mut s = session(&["x", "nope(x)", "x^2"], "0", "1", "3");
        assert!(s.submit().is_err());
        assert!(s.chart().is_none());
        assert!(s.renderer().rendered.is_empty());
    }

    #[test]
    fn test_render_failure_after_previous_chart_destroyed() {
        let mut s = session(&["x"], "0", "1", "3");
        s.submit().unwrap();
        s.renderer_mut().fail_with = Some("backend gone".to_string());
        assert_eq!(
            s.submit(),
            Err(PlotError::Render("backend gone".to_string()))
        );
        assert!(s.chart().is_none());
        assert!(s.chart_data().is_none());
        assert_eq!(
            s.error_message().as_deref(),
            Some("Failed to draw the chart: backend gone")
        );
    }

    #[test]
    fn test_mount_plots_defaults() {
        let mut s = PlotSession::new(RecordingRenderer::default());
        s.mount().unwrap();
        let data = s.chart_data().unwrap();
        assert_eq!(data.series[0].label, "y = x^2");
        assert_eq!(data.x_values.len(), 200);
    }

    #[test]
    fn test_colors_follow_position_after_removal() {
        let mut s = session(&["x", "x^2", "x^3"], "0", "1", "3");
        s.submit().unwrap();
        let before: Vec<_> = s.chart_data().unwrap().series.iter().map(|x| x.color).collect();
        let first = s.expressions().entries()[0].id;
        assert!(s.remove_expression(first));
        s.submit().unwrap();
        let after: Vec<_> = s.chart_data().unwrap().series.iter().map(|x| x.color).collect();
        assert_eq!(after, before[..2].to_vec());
        assert_eq!(s.chart_data().unwrap().series[0].label, "y = x^2");
    }

    #[test]
    fn test_constant_curves_get_markers() {
        let mut s = session(&["2", "x"], "0", "1", "3");
        s.submit().unwrap();
        let series = &s.chart_data().unwrap().series;
        assert!(series[0].point_radius > 0);
        assert_eq!(series[1].point_radius, 0);
        assert_eq!(series[0].values, vec![Some(2.0); 3]);
    }

    #[test]
    fn test_overlong_expression_is_a_parse_error() {
        let long_sum = vec!["x"; 2000].join("+");
        let deep = format!("{}x{}", "(".repeat(20000), ")".repeat(20000));
        for text in [long_sum, deep] {
            let mut s = session(&[text.as_str()], "0", "1", "3");
            assert!(matches!(s.submit(), Err(PlotError::Parse { .. })));
            assert!(s.chart().is_none());
            assert_eq!(s.status(), crate::plotter::session::PlotStatus::Idle);
        }
    }

    #[test]
    fn test_svg_session_with_overflowing_y_span_fails_fast() {
        let mut s = PlotSession::with_inputs(
            SvgRenderer::new((400, 300)),
            ExpressionList::from_texts(["exp(x)", "-exp(x)"]),
            DomainInput::new("700", "709.7", "50"),
        );
        assert!(matches!(s.submit(), Err(PlotError::Render(_))));
        assert!(s.chart().is_none());
        assert!(s.error_message().is_some());
    }

    #[test]
    fn test_svg_session_draws_huge_values() {
        let mut s = PlotSession::with_inputs(
            SvgRenderer::new((400, 300)),
            ExpressionList::from_texts(["exp(x)", "1e300"]),
            DomainInput::new("700", "709.7", "50"),
        );
        s.submit().unwrap();
        assert!(s.chart().unwrap().document().contains("<polyline"));
    }
}
