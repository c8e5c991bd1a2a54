//! Figure construction from a resolved price table.

use super::figure::{
    BarTrace, CandlestickTrace, DirectionStyle, Figure, Font, Layout, Margin, Marker, PlotConfig,
    RangeSlider, SecondaryYAxis, Trace, XAxis, YAxis,
};
use crate::data::{OhlcColumns, TabularResponse};

pub const INCREASING_COLOR: &str = "#26a69a";
pub const DECREASING_COLOR: &str = "#ef5350";
pub const VOLUME_COLOR: &str = "rgba(100, 100, 100, 0.3)";
pub const PAPER_BGCOLOR: &str = "#f4f7f6";
pub const PLOT_BGCOLOR: &str = "#ffffff";
pub const FONT_FAMILY: &str =
    r#"-apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif"#;

/// Price panel takes the top 75% when volume is shown.
pub const PRICE_DOMAIN: [f64; 2] = [0.25, 1.0];
/// Volume panel takes the bottom 20%, leaving a 5% gap.
pub const VOLUME_DOMAIN: [f64; 2] = [0.0, 0.2];

pub const MARGIN: Margin = Margin {
    t: 50,
    b: 50,
    l: 50,
    r: 20,
};

/// Chart title, e.g. `AAPL Stock Price (1Y)`.
pub fn chart_title(symbol: &str, period: &str) -> String {
    format!("{symbol} Stock Price ({})", period.to_uppercase())
}

/// Build the candlestick figure, adding a volume subplot when the table has one.
pub fn build_figure(
    symbol: &str,
    period: &str,
    table: &TabularResponse,
    columns: &OhlcColumns,
) -> Figure {
    let x = table.labels().to_vec();

    let candles = CandlestickTrace {
        x: x.clone(),
        open: table.column(columns.open),
        high: table.column(columns.high),
        low: table.column(columns.low),
        close: table.column(columns.close),
        name: symbol.to_string(),
        increasing: DirectionStyle::solid(INCREASING_COLOR),
        decreasing: DirectionStyle::solid(DECREASING_COLOR),
    };

    let mut layout = Layout {
        title: chart_title(symbol, period),
        xaxis: XAxis {
            title: "Date".to_string(),
            axis_type: "date".to_string(),
            rangeslider: RangeSlider { visible: false },
        },
        yaxis: YAxis {
            title: "Price (USD)".to_string(),
            autorange: true,
            domain: None,
        },
        yaxis2: None,
        margin: MARGIN,
        paper_bgcolor: PAPER_BGCOLOR.to_string(),
        plot_bgcolor: PLOT_BGCOLOR.to_string(),
        font: Font {
            family: FONT_FAMILY.to_string(),
        },
    };

    let mut data = vec![Trace::Candlestick(candles)];

    if let Some(volume) = columns.volume {
        data.push(Trace::Bar(BarTrace {
            x,
            y: table.column(volume),
            name: "Volume".to_string(),
            yaxis: "y2".to_string(),
            marker: Marker {
                color: VOLUME_COLOR.to_string(),
            },
        }));
        layout.yaxis.domain = Some(PRICE_DOMAIN);
        layout.yaxis2 = Some(SecondaryYAxis {
            title: "Volume".to_string(),
            overlaying: "y".to_string(),
            side: "right".to_string(),
            showgrid: false,
            autorange: true,
            domain: VOLUME_DOMAIN,
        });
    }

    Figure {
        data,
        layout,
        config: PlotConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_table(columns: &[&str]) -> TabularResponse {
        let full = [
            ("Open", [10.0, 11.0]),
            ("High", [12.0, 13.0]),
            ("Low", [9.0, 10.0]),
            ("Close", [11.0, 12.0]),
            ("Volume", [1000.0, 1500.0]),
        ];
        let picked: Vec<_> = columns
            .iter()
            .map(|c| full.iter().find(|(n, _)| n == c).unwrap())
            .collect();
        TabularResponse {
            index: Some(vec!["2024-01-01".into(), "2024-01-02".into()]),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            data: (0..2)
                .map(|row| picked.iter().map(|(_, v)| Some(v[row])).collect())
                .collect(),
        }
    }

    #[test]
    fn candlestick_and_volume_from_sample() {
        let table = sample_table(&["Open", "High", "Low", "Close", "Volume"]);
        let cols = OhlcColumns::resolve(&table.columns).unwrap();
        let fig = build_figure("AAPL", "1y", &table, &cols);

        assert_eq!(fig.data.len(), 2);
        let c = fig.candlestick().unwrap();
        assert_eq!(c.open, vec![Some(10.0), Some(11.0)]);
        assert_eq!(c.high, vec![Some(12.0), Some(13.0)]);
        assert_eq!(c.low, vec![Some(9.0), Some(10.0)]);
        assert_eq!(c.close, vec![Some(11.0), Some(12.0)]);
        assert_eq!(c.name, "AAPL");

        let v = fig.volume().unwrap();
        assert_eq!(v.y, vec![Some(1000.0), Some(1500.0)]);
        assert_eq!(v.yaxis, "y2");

        assert_eq!(fig.layout.yaxis.domain, Some([0.25, 1.0]));
        assert_eq!(fig.layout.yaxis2.as_ref().unwrap().domain, [0.0, 0.2]);
        assert_eq!(fig.layout.title, "AAPL Stock Price (1Y)");
    }

    #[test]
    fn no_volume_means_single_trace_and_no_secondary_axis() {
        let table = sample_table(&["Open", "High", "Low", "Close"]);
        let cols = OhlcColumns::resolve(&table.columns).unwrap();
        let fig = build_figure("AAPL", "1y", &table, &cols);

        assert_eq!(fig.data.len(), 1);
        assert!(fig.layout.yaxis2.is_none());
        assert!(fig.layout.yaxis.domain.is_none());

        let json = serde_json::to_value(&fig).unwrap();
        assert!(json["layout"].get("yaxis2").is_none());
        assert!(json["layout"]["yaxis"].get("domain").is_none());
    }

    #[test]
    fn serializes_plotly_field_names() {
        let table = sample_table(&["Open", "High", "Low", "Close", "Volume"]);
        let cols = OhlcColumns::resolve(&table.columns).unwrap();
        let json = serde_json::to_value(build_figure("AAPL", "3mo", &table, &cols)).unwrap();

        assert_eq!(json["data"][0]["type"], "candlestick");
        assert_eq!(json["data"][0]["increasing"]["line"]["color"], "#26a69a");
        assert_eq!(json["data"][0]["decreasing"]["fillcolor"], "#ef5350");
        assert_eq!(json["data"][1]["type"], "bar");
        assert_eq!(json["data"][1]["marker"]["color"], "rgba(100, 100, 100, 0.3)");
        assert_eq!(json["layout"]["xaxis"]["type"], "date");
        assert_eq!(json["layout"]["xaxis"]["rangeslider"]["visible"], false);
        assert_eq!(json["layout"]["yaxis"]["title"], "Price (USD)");
        assert_eq!(json["layout"]["yaxis2"]["overlaying"], "y");
        assert_eq!(json["layout"]["yaxis2"]["side"], "right");
        assert_eq!(json["layout"]["margin"]["r"], 20);
        assert_eq!(json["layout"]["paper_bgcolor"], "#f4f7f6");
        assert_eq!(json["layout"]["plot_bgcolor"], "#ffffff");
        assert_eq!(json["layout"]["title"], "AAPL Stock Price (3MO)");
        assert_eq!(json["config"]["responsive"], true);
        assert!(json["layout"]["font"]["family"]
            .as_str()
            .unwrap()
            .starts_with("-apple-system"));
    }

    #[test]
    fn null_cells_serialize_as_null() {
        let table = TabularResponse {
            index: Some(vec!["2024-01-01".into()]),
            columns: vec!["open".into(), "high".into(), "low".into(), "close".into()],
            data: vec![vec![Some(1.0), None, Some(0.5), Some(0.9)]],
        };
        let cols = OhlcColumns::resolve(&table.columns).unwrap();
        let json = serde_json::to_value(build_figure("X", "1y", &table, &cols)).unwrap();
        assert!(json["data"][0]["high"][0].is_null());
    }

    proptest! {
        #[test]
        fn series_lengths_match_index(
            rows in proptest::collection::vec(proptest::array::uniform5(0.0f64..1000.0), 1..60),
            with_volume in any::<bool>(),
        ) {
            let mut columns = vec!["Open".to_string(), "High".into(), "Low".into(), "Close".into()];
            if with_volume {
                columns.push("Volume".into());
            }
            let width = columns.len();
            let table = TabularResponse {
                index: Some((0..rows.len()).map(|i| format!("2024-01-{:02}", i % 28 + 1)).collect()),
                columns,
                data: rows.iter().map(|r| r[..width].iter().copied().map(Some).collect()).collect(),
            };
            let cols = OhlcColumns::resolve(&table.columns).unwrap();
            let fig = build_figure("SYM", "1y", &table, &cols);

            let candles = fig.candlestick().unwrap();
            prop_assert!(candles.is_aligned());
            prop_assert_eq!(candles.x.len(), rows.len());
            prop_assert_eq!(fig.data.len(), if with_volume { 2 } else { 1 });
            if let Some(v) = fig.volume() {
                prop_assert_eq!(v.y.len(), rows.len());
            }
        }
    }
}
