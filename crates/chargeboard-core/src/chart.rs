//! Heatmap chart description
//!
//! Serializes to a Plotly figure (`{data, layout}`) that the dashboard page
//! hands straight to `Plotly.react`.

use serde::Serialize;

use crate::analytics::CellRef;
use crate::models::calendar::{
    display_labels, display_row, DAYS_PER_WEEK, HOURS_PER_DAY, HOUR_LABELS,
};
use crate::models::OccupancyMatrix;

pub const HOVER_TEMPLATE: &str = "<b> %{y}  %{x} <br><br> %{z} Charges";
pub const COLOR_LOW: &str = "#caf3ff";
pub const COLOR_HIGH: &str = "#2c82ff";
pub const HIGHLIGHT_COLOR: &str = "#ff6347";
pub const HIGHLIGHT_FONT_SIZE: u32 = 15;

/// Complete figure: one heatmap trace plus layout
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapFigure {
    pub data: Vec<HeatmapTrace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapTrace {
    pub x: Vec<&'static str>,
    pub y: Vec<&'static str>,
    pub z: OccupancyMatrix,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub hovertemplate: &'static str,
    pub showscale: bool,
    pub colorscale: Vec<(f64, &'static str)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub margin: Margin,
    pub modebar: Modebar,
    pub font: Font,
    pub annotations: Vec<Annotation>,
    pub shapes: Vec<Shape>,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub hovermode: &'static str,
    pub showlegend: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margin {
    pub l: u32,
    pub b: u32,
    pub t: u32,
    pub r: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Modebar {
    pub orientation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl Font {
    fn family(family: &'static str) -> Self {
        Self {
            family,
            color: None,
            size: None,
        }
    }
}

/// Count printed on top of a cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub showarrow: bool,
    pub text: String,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x: &'static str,
    pub y: &'static str,
    pub font: Font,
}

/// Outline drawn around the selected cell, in paper coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub line: ShapeLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeLine {
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub side: &'static str,
    pub ticks: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticklen: Option<u32>,
    pub tickfont: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickcolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticksuffix: Option<&'static str>,
}

impl HeatmapFigure {
    /// Describe `matrix`, emphasising `highlight` if set
    pub fn build(matrix: &OccupancyMatrix, highlight: Option<CellRef>) -> Self {
        let trace = HeatmapTrace {
            x: HOUR_LABELS.to_vec(),
            y: display_labels(),
            z: *matrix,
            kind: "heatmap",
            name: "",
            hovertemplate: HOVER_TEMPLATE,
            showscale: false,
            colorscale: vec![(0.0, COLOR_LOW), (1.0, COLOR_HIGH)],
        };

        let layout = Layout {
            margin: Margin {
                l: 70,
                b: 50,
                t: 50,
                r: 50,
            },
            modebar: Modebar {
                orientation: "v",
            },
            font: Font::family("Open Sans"),
            annotations: annotations(matrix, highlight),
            shapes: highlight.map(highlight_shape).into_iter().collect(),
            xaxis: Axis {
                side: "top",
                ticks: "",
                ticklen: Some(2),
                tickfont: Font::family("sans-serif"),
                tickcolor: Some("#ffffff"),
                ticksuffix: None,
            },
            yaxis: Axis {
                side: "left",
                ticks: "",
                ticklen: None,
                tickfont: Font::family("sans-serif"),
                tickcolor: None,
                ticksuffix: Some(" "),
            },
            hovermode: "closest",
            showlegend: false,
        };

        Self {
            data: vec![trace],
            layout,
        }
    }
}

fn annotations(matrix: &OccupancyMatrix, highlight: Option<CellRef>) -> Vec<Annotation> {
    matrix
        .iter_cells()
        .map(|(weekday, hour, count)| {
            let cell = CellRef { weekday, hour };
            let font = if highlight == Some(cell) {
                Font {
                    family: "sans-serif",
                    color: Some(HIGHLIGHT_COLOR),
                    size: Some(HIGHLIGHT_FONT_SIZE),
                }
            } else {
                Font::family("sans-serif")
            };
            Annotation {
                showarrow: false,
                text: format!("<b>{}</b>", count),
                xref: "x",
                yref: "y",
                x: cell.hour_label(),
                y: cell.weekday_label(),
                font,
            }
        })
        .collect()
}

/// Rectangle around `cell`; rows are counted from the bottom of the plot
pub fn highlight_shape(cell: CellRef) -> Shape {
    let x0 = f64::from(cell.hour) / HOURS_PER_DAY as f64;
    let y0 = display_row(cell.weekday) as f64 / DAYS_PER_WEEK as f64;
    Shape {
        kind: "rect",
        xref: "paper",
        yref: "paper",
        x0,
        x1: x0 + 1.0 / HOURS_PER_DAY as f64,
        y0,
        y1: y0 + 1.0 / DAYS_PER_WEEK as f64,
        line: ShapeLine {
            color: HIGHLIGHT_COLOR,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_figure_axes_and_annotations() {
        let mut matrix = OccupancyMatrix::zeros();
        matrix.increment(Weekday::Wed, 14);
        let figure = HeatmapFigure::build(&matrix, None);

        let trace = &figure.data[0];
        assert_eq!(trace.x.len(), 24);
        assert_eq!(trace.x[0], "00");
        assert_eq!(trace.y[0], "Sunday");
        assert_eq!(trace.y[6], "Monday");
        assert_eq!(figure.layout.annotations.len(), 7 * 24);
        assert!(figure.layout.shapes.is_empty());

        let wed_14 = figure
            .layout
            .annotations
            .iter()
            .find(|a| a.x == "14" && a.y == "Wednesday")
            .unwrap();
        assert_eq!(wed_14.text, "<b>1</b>");
        assert_eq!(wed_14.font.color, None);
    }

    #[test]
    fn test_highlighted_cell_gets_style_and_shape() {
        let matrix = OccupancyMatrix::zeros();
        let cell = CellRef::from_labels("14", "Wednesday").unwrap();
        let figure = HeatmapFigure::build(&matrix, Some(cell));

        let styled: Vec<_> = figure
            .layout
            .annotations
            .iter()
            .filter(|a| a.font.color == Some(HIGHLIGHT_COLOR))
            .collect();
        assert_eq!(styled.len(), 1);
        assert_eq!(styled[0].x, "14");
        assert_eq!(styled[0].y, "Wednesday");
        assert_eq!(styled[0].font.size, Some(HIGHLIGHT_FONT_SIZE));

        assert_eq!(figure.layout.shapes.len(), 1);
        let shape = &figure.layout.shapes[0];
        assert!((shape.x0 - 14.0 / 24.0).abs() < 1e-12);
        assert!((shape.y0 - 4.0 / 7.0).abs() < 1e-12);
        assert!((shape.x1 - shape.x0 - 1.0 / 24.0).abs() < 1e-12);
        assert!((shape.y1 - shape.y0 - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_figure_json_shape() {
        let figure = HeatmapFigure::build(&OccupancyMatrix::zeros(), None);
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["data"][0]["type"], "heatmap");
        assert_eq!(json["data"][0]["showscale"], false);
        assert_eq!(json["data"][0]["colorscale"][1][1], COLOR_HIGH);
        assert_eq!(json["data"][0]["z"].as_array().unwrap().len(), 7);
        assert_eq!(json["layout"]["hovermode"], "closest");
        assert_eq!(json["layout"]["xaxis"]["side"], "top");
        assert_eq!(json["layout"]["yaxis"]["ticksuffix"], " ");
        assert!(json["layout"]["yaxis"].get("tickcolor").is_none());
        assert!(json["layout"]["annotations"][0]["font"].get("color").is_none());
    }
}
