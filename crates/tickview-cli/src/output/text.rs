//! Terminal dashboard: summary block, price/SMA plot, volume strip and a
//! table of the most recent sessions.

use std::fmt::Write;

use tickview_core::{
    ChartFrame, FeaturedRecord, RenderError, Renderer, Series, SmaPeriod, Summary, Symbol,
};

const PLOT_HEIGHT: usize = 12;
const PLOT_WIDTH: usize = 72;
pub const TABLE_ROWS: usize = 30;
const AXIS_WIDTH: usize = 10;

const CLOSE_MARK: char = '*';
const SMA_MARK: char = '-';
const BOTH_MARK: char = '#';
const VOLUME_LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone)]
pub struct TextRenderer {
    height: usize,
    width: usize,
    table_rows: usize,
    dropped: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            height: PLOT_HEIGHT,
            width: PLOT_WIDTH,
            table_rows: TABLE_ROWS,
            dropped: 0,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plot area size in characters. Both are clamped to at least 2.
    pub fn with_plot_size(mut self, width: usize, height: usize) -> Self {
        self.width = width.max(2);
        self.height = height.max(2);
        self
    }

    pub fn with_table_rows(mut self, table_rows: usize) -> Self {
        self.table_rows = table_rows;
        self
    }

    /// Number of provider rows discarded during normalization, noted in the footer.
    pub fn with_dropped(mut self, dropped: usize) -> Self {
        self.dropped = dropped;
        self
    }

    fn write_summary(
        &self,
        out: &mut String,
        series: &Series,
        symbol: &Symbol,
        period: SmaPeriod,
        summary: &Summary,
    ) -> Result<(), RenderError> {
        writeln!(out, "{symbol}  daily close with {period}-day SMA")?;
        writeln!(out)?;
        writeln!(out, "  last session  {}", summary.latest_date)?;
        writeln!(out, "  close         {:.2}", summary.latest_close)?;
        match summary.latest_sma {
            Some(sma) => writeln!(out, "  sma({period})       {sma:.2}")?,
            None => writeln!(
                out,
                "  sma({period})       n/a (needs {period} sessions, window has {})",
                series.len()
            )?,
        }
        if let (Some(first), Some(last)) = (series.first(), series.last()) {
            writeln!(
                out,
                "  window        {} sessions, {} to {}",
                series.len(),
                first.price.date,
                last.price.date
            )?;
        }
        Ok(())
    }

    fn write_plot(&self, out: &mut String, frame: &ChartFrame) -> Result<(), RenderError> {
        let Some((low, high)) = frame.price_range() else {
            return Ok(());
        };
        let columns = bucket_ends(frame.len(), self.width);
        let mut grid = vec![vec![' '; columns.len()]; self.height];

        for (column, &index) in columns.iter().enumerate() {
            let close_row = self.scale(frame.close[index], low, high);
            grid[close_row][column] = CLOSE_MARK;

            if let Some(sma) = frame.sma[index] {
                let sma_row = self.scale(sma, low, high);
                grid[sma_row][column] = if sma_row == close_row {
                    BOTH_MARK
                } else {
                    SMA_MARK
                };
            }
        }

        writeln!(out)?;
        for (row, cells) in grid.iter().enumerate().rev() {
            let label = if row + 1 == self.height {
                format!("{high:>AXIS_WIDTH$.2}")
            } else if row == 0 {
                format!("{low:>AXIS_WIDTH$.2}")
            } else {
                " ".repeat(AXIS_WIDTH)
            };
            let line = cells.iter().collect::<String>();
            writeln!(out, "{label} |{}", line.trim_end())?;
        }
        writeln!(
            out,
            "{} +{}",
            " ".repeat(AXIS_WIDTH),
            "-".repeat(columns.len())
        )?;
        writeln!(
            out,
            "{} {CLOSE_MARK} close  {SMA_MARK} sma  {BOTH_MARK} both",
            " ".repeat(AXIS_WIDTH)
        )?;
        Ok(())
    }

    fn write_volume(&self, out: &mut String, frame: &ChartFrame) -> Result<(), RenderError> {
        let max = frame.max_volume();
        let columns = bucket_ranges(frame.len(), self.width);

        let strip = columns
            .iter()
            .map(|&(start, end)| {
                let volume = frame.volume[start..end].iter().copied().max().unwrap_or(0);
                VOLUME_LEVELS[volume_level(volume, max)]
            })
            .collect::<String>();

        writeln!(out, "{:>AXIS_WIDTH$} |{strip}", "volume")?;
        writeln!(out, "{:>AXIS_WIDTH$} |max {max}", "")?;
        Ok(())
    }

    fn write_table(&self, out: &mut String, series: &Series) -> Result<(), RenderError> {
        if self.table_rows == 0 {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(
            out,
            "{:<10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>12}",
            "date", "open", "high", "low", "close", "sma", "volume"
        )?;
        for record in series.tail(self.table_rows).iter() {
            write_row(out, record)?;
        }
        Ok(())
    }

    /// Grid row for `value`, 0 at the bottom.
    fn scale(&self, value: f64, low: f64, high: f64) -> usize {
        let top = self.height - 1;
        if high <= low {
            return top / 2;
        }
        let position = ((value - low) / (high - low) * top as f64).round();
        (position.max(0.0) as usize).min(top)
    }
}

impl Renderer for TextRenderer {
    fn render(
        &self,
        series: &Series,
        symbol: &Symbol,
        period: SmaPeriod,
    ) -> Result<String, RenderError> {
        let summary = Summary::from_series(series).ok_or(RenderError::EmptySeries)?;
        let frame = ChartFrame::from_series(series);
        let mut out = String::new();

        self.write_summary(&mut out, series, symbol, period, &summary)?;
        self.write_plot(&mut out, &frame)?;
        self.write_volume(&mut out, &frame)?;
        self.write_table(&mut out, series)?;

        if self.dropped > 0 {
            writeln!(out)?;
            writeln!(
                out,
                "note: {} provider rows were dropped as invalid",
                self.dropped
            )?;
        }

        Ok(out)
    }
}

fn write_row(out: &mut String, record: &FeaturedRecord) -> Result<(), RenderError> {
    let price = &record.price;
    let sma = record
        .sma
        .map_or_else(|| String::from("-"), |sma| format!("{sma:.2}"));
    writeln!(
        out,
        "{:<10}  {:>10.2}  {:>10.2}  {:>10.2}  {:>10.2}  {:>10}  {:>12}",
        price.date, price.open, price.high, price.low, price.close, sma, price.volume
    )?;
    Ok(())
}

/// Split `len` rows into at most `width` contiguous, non-empty column ranges.
fn bucket_ranges(len: usize, width: usize) -> Vec<(usize, usize)> {
    let columns = len.min(width);
    (0..columns)
        .map(|column| (column * len / columns, (column + 1) * len / columns))
        .collect()
}

/// Index of the last row in each column; the plot shows the value at column end.
fn bucket_ends(len: usize, width: usize) -> Vec<usize> {
    bucket_ranges(len, width)
        .into_iter()
        .map(|(_, end)| end - 1)
        .collect()
}

fn volume_level(volume: u64, max: u64) -> usize {
    let top = VOLUME_LEVELS.len() - 1;
    if max == 0 || volume == 0 {
        return 0;
    }
    let level = (volume as f64 / max as f64 * top as f64).ceil() as usize;
    level.clamp(1, top)
}

#[cfg(test)]
mod tests {
    use tickview_core::{PriceRecord, TradingDate};

    use super::*;

    fn series(closes: &[f64], sma_from: usize) -> Series {
        let start = TradingDate::parse("2024-01-01").expect("valid").into_inner();
        Series::new(
            closes
                .iter()
                .enumerate()
                .map(|(offset, close)| {
                    FeaturedRecord::new(
                        PriceRecord {
                            date: TradingDate::from_date(
                                start + time::Duration::days(offset as i64),
                            ),
                            open: *close,
                            high: *close + 1.0,
                            low: *close - 1.0,
                            close: *close,
                            volume: (offset as u64 + 1) * 100,
                        },
                        (offset >= sma_from).then_some(*close - 0.5),
                    )
                })
                .collect(),
        )
        .expect("ordered")
    }

    #[test]
    fn dashboard_has_every_section() {
        let series = series(&[10.0, 11.0, 12.0, 13.0, 14.0], 2);
        let symbol = Symbol::parse("IBM").expect("valid");

        let text = TextRenderer::new()
            .with_dropped(3)
            .render(&series, &symbol, SmaPeriod::new(3).expect("valid"))
            .expect("renders");

        assert!(text.starts_with("IBM  daily close with 3-day SMA"));
        assert!(text.contains("last session  2024-01-05"));
        assert!(text.contains("close         14.00"));
        assert!(text.contains("sma(3)       13.50"));
        assert!(text.contains("window        5 sessions, 2024-01-01 to 2024-01-05"));
        assert!(text.contains("volume |"));
        assert!(text.contains("note: 3 provider rows were dropped as invalid"));
        assert!(text.contains(CLOSE_MARK));
    }

    #[test]
    fn undefined_average_is_explained() {
        let series = series(&[10.0, 11.0], usize::MAX);
        let symbol = Symbol::parse("IBM").expect("valid");

        let text = TextRenderer::new()
            .render(&series, &symbol, SmaPeriod::new(20).expect("valid"))
            .expect("renders");

        assert!(text.contains("n/a (needs 20 sessions, window has 2)"));
        assert!(!text.contains("note:"));
    }

    #[test]
    fn table_lists_trailing_rows_only() {
        let closes = (1..=15).map(f64::from).collect::<Vec<_>>();
        let text = TextRenderer::new()
            .with_table_rows(3)
            .render(
                &series(&closes, 0),
                &Symbol::parse("IBM").expect("valid"),
                SmaPeriod::new(5).expect("valid"),
            )
            .expect("renders");

        assert!(text.contains("2024-01-13"));
        assert!(text.contains("2024-01-15"));
        assert!(!text.contains("2024-01-12  "));
    }

    #[test]
    fn default_table_lists_the_last_thirty_sessions() {
        let closes = (1..=40).map(f64::from).collect::<Vec<_>>();
        let text = TextRenderer::new()
            .render(
                &series(&closes, 0),
                &Symbol::parse("IBM").expect("valid"),
                SmaPeriod::new(5).expect("valid"),
            )
            .expect("renders");

        let rows = text.lines().filter(|line| line.starts_with("2024-")).collect::<Vec<_>>();
        assert_eq!(rows.len(), TABLE_ROWS);
        assert!(rows[0].starts_with("2024-01-11"));
        assert!(rows[TABLE_ROWS - 1].starts_with("2024-02-09"));
    }

    #[test]
    fn plot_is_bounded_by_width_and_height() {
        let closes = (0..500).map(|i| 100.0 + f64::from(i % 37)).collect::<Vec<_>>();
        let text = TextRenderer::new()
            .with_plot_size(40, 6)
            .with_table_rows(0)
            .render(
                &series(&closes, 10),
                &Symbol::parse("IBM").expect("valid"),
                SmaPeriod::new(10).expect("valid"),
            )
            .expect("renders");

        let plot_rows = text
            .lines()
            .filter(|line| line.contains(" |") && !line.contains("volume") && !line.contains("max"))
            .collect::<Vec<_>>();
        assert_eq!(plot_rows.len(), 6);
        assert!(plot_rows
            .iter()
            .all(|line| line.chars().count() <= AXIS_WIDTH + 2 + 40));
    }

    #[test]
    fn buckets_cover_every_row_once() {
        let ranges = bucket_ranges(10, 4);
        assert_eq!(ranges, vec![(0, 2), (2, 5), (5, 7), (7, 10)]);
        assert_eq!(bucket_ends(3, 72), vec![0, 1, 2]);
    }

    #[test]
    fn volume_levels_scale_to_the_maximum() {
        assert_eq!(volume_level(0, 100), 0);
        assert_eq!(volume_level(1, 100), 1);
        assert_eq!(volume_level(100, 100), 8);
        assert_eq!(volume_level(5, 0), 0);
    }
}
