//! Terminal line chart of a price history: x = date, y = price, every point labelled.

use crate::core::PriceObservation;

const POINT: char = '●';

pub fn render_chart(observations: &[PriceObservation], height: usize) -> String {
    let (Some(min), Some(max)) = (
        observations.iter().map(|o| o.price).min(),
        observations.iter().map(|o| o.price).max(),
    ) else {
        return String::new();
    };
    let height = height.max(2);

    let level = |price: u64| -> usize {
        if max == min {
            return height / 2;
        }
        let ratio = (price - min) as f64 / (max - min) as f64;
        (ratio * (height - 1) as f64).round() as usize
    };

    // Wide enough for the longest label and an `MM-DD` date, plus a gap.
    let col_width = observations
        .iter()
        .map(|o| o.price.to_string().len())
        .max()
        .unwrap_or(0)
        .max(5)
        + 1;
    let axis_width = max.to_string().len();

    let (max_row, min_row) = (level(max), level(min));

    let mut out = String::new();
    // The extra top row only carries labels for points on the highest level.
    for row in (0..=height).rev() {
        let axis_label = if row == max_row {
            max.to_string()
        } else if row == min_row {
            min.to_string()
        } else {
            String::new()
        };
        let border = if row == height { ' ' } else { '│' };

        let mut line = format!("{axis_label:>axis_width$} {border}");
        for observation in observations {
            let point_level = level(observation.price);
            let cell = if point_level == row {
                POINT.to_string()
            } else if point_level + 1 == row {
                observation.price.to_string()
            } else {
                String::new()
            };
            line.push_str(&format!("{cell:^col_width$}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "{:>axis_width$} └{}\n",
        "",
        "─".repeat(col_width * observations.len())
    ));
    let mut dates = format!("{:>axis_width$}  ", "");
    for observation in observations {
        let date = observation.date.format("%m-%d").to_string();
        dates.push_str(&format!("{date:^col_width$}"));
    }
    out.push_str(dates.trim_end());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(day: u32, price: u64) -> PriceObservation {
        PriceObservation::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), price)
    }

    #[test]
    fn test_render_chart_places_points_and_labels() {
        let chart = render_chart(&[obs(1, 999), obs(2, 1099)], 4);
        let lines: Vec<&str> = chart.lines().collect();

        // 5 plot rows, the x axis and the date row
        assert_eq!(lines.len(), 7);
        assert!(lines[0].contains("1099"));
        assert!(lines[1].starts_with("1099 │"));
        assert!(lines[1].contains(POINT));
        assert!(lines[3].contains("999"));
        assert!(lines[4].trim_start().starts_with("999 │"));
        assert!(lines[4].contains(POINT));
        assert_eq!(chart.matches(POINT).count(), 2);
        assert!(lines[6].contains("01-01"));
        assert!(lines[6].contains("01-02"));
    }

    #[test]
    fn test_render_chart_flat_history() {
        let chart = render_chart(&[obs(1, 500), obs(2, 500), obs(3, 500)], 6);
        assert_eq!(chart.matches(POINT).count(), 3);
        assert_eq!(chart.lines().count(), 9);

        let points_line = chart.lines().find(|l| l.contains(POINT)).unwrap();
        assert!(points_line.starts_with("500 │"), "{chart}");
        let labelled_rows = chart
            .lines()
            .filter(|l| l.contains('│'))
            .filter(|l| l.split('│').next().is_some_and(|axis| !axis.trim().is_empty()))
            .count();
        assert_eq!(labelled_rows, 1, "{chart}");
    }

    #[test]
    fn test_render_chart_empty() {
        assert!(render_chart(&[], 10).is_empty());
    }
}
