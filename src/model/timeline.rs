use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Narrowest column the layout will produce, whatever the viewport width.
pub const MIN_COLUMN_WIDTH: f32 = 40.0;

/// Controls what unit one timeline column represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    #[default]
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub fn all() -> &'static [Granularity] {
        &[Granularity::Month, Granularity::Quarter, Granularity::Year]
    }

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Month => "Month",
            Granularity::Quarter => "Quarter",
            Granularity::Year => "Year",
        }
    }

    /// Number of columns the timeline spans.
    pub fn unit_count(self) -> u32 {
        match self {
            Granularity::Month => 60,
            Granularity::Quarter => 24,
            Granularity::Year => 10,
        }
    }

    pub fn months_per_unit(self) -> u32 {
        match self {
            Granularity::Month => 1,
            Granularity::Quarter => 3,
            Granularity::Year => 12,
        }
    }

    /// Columns that fit across one viewport width.
    fn columns_per_viewport(self) -> f32 {
        match self {
            Granularity::Month | Granularity::Quarter => 12.0,
            Granularity::Year => 5.0,
        }
    }

    /// Column width in pixels for a viewport of the given width.
    pub fn column_width(self, viewport_width: f32) -> f32 {
        (viewport_width / self.columns_per_viewport())
            .floor()
            .max(MIN_COLUMN_WIDTH)
    }
}

/// Date ↔ pixel mapping anchored at a fixed epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    /// Date at pixel 0.
    pub epoch: NaiveDate,
    pub granularity: Granularity,
}

impl Timeline {
    pub fn new(epoch: NaiveDate, granularity: Granularity) -> Self {
        Self { epoch, granularity }
    }

    /// Convert a date to an x offset from the epoch.
    pub fn date_to_x(&self, date: NaiveDate, col_width: f32) -> f32 {
        let months = months_since(self.epoch, date);
        (months / f64::from(self.granularity.months_per_unit()) * f64::from(col_width)) as f32
    }

    /// Convert an x offset back to a date, snapped to a quarter of a column so
    /// that it lands on the same grid drags quantize to.
    pub fn x_to_date(&self, x: f32, col_width: f32) -> NaiveDate {
        if col_width <= 0.0 || !x.is_finite() {
            return self.epoch;
        }
        let steps = (f64::from(x) / f64::from(col_width) * 4.0).round() as i64;
        // Quarter months: a quarter column spans `months_per_unit` of them.
        let quarters = steps.saturating_mul(i64::from(self.granularity.months_per_unit()));
        let whole = quarters.div_euclid(4);
        let extra = quarters.rem_euclid(4);

        let base = add_months(self.epoch, whole);
        if extra == 0 {
            return base;
        }
        let days_in_month = (add_months(base, 1) - base).num_days();
        let extra_days = (extra as f64 / 4.0 * days_in_month as f64).round() as i64;
        base.checked_add_days(Days::new(extra_days.unsigned_abs()))
            .unwrap_or(base)
    }

    /// Grid quantum used by drags: a quarter of a column.
    pub fn snap_step(col_width: f32) -> f32 {
        col_width / 4.0
    }

    /// Round `x` to the nearest grid quantum.
    pub fn quantize(x: f32, col_width: f32) -> f32 {
        let step = Self::snap_step(col_width);
        if step <= 0.0 {
            return x;
        }
        (x / step).round() * step
    }

    /// Total width in pixels of the whole timeline.
    pub fn total_width(&self, col_width: f32) -> f32 {
        self.granularity.unit_count() as f32 * col_width
    }

    /// First date of column `index`.
    pub fn unit_start(&self, index: u32) -> NaiveDate {
        add_months(
            self.epoch,
            i64::from(index) * i64::from(self.granularity.months_per_unit()),
        )
    }

    /// Exclusive end date of the whole timeline.
    pub fn end(&self) -> NaiveDate {
        self.unit_start(self.granularity.unit_count())
    }

    /// Approximate width of one day, for deciding whether day-level detail
    /// is worth drawing.
    pub fn day_width(&self, col_width: f32) -> f32 {
        let days_per_unit = 30.44 * self.granularity.months_per_unit() as f32;
        col_width / days_per_unit
    }
}

/// The scrolled window onto the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineViewport {
    /// Horizontal scroll offset in timeline pixels.
    pub scroll_left: f32,
    /// Visible width in pixels.
    pub width: f32,
    /// Date of the "now" marker.
    pub today: NaiveDate,
}

impl TimelineViewport {
    pub fn new(width: f32, today: NaiveDate) -> Self {
        Self {
            scroll_left: 0.0,
            width,
            today,
        }
    }

    pub fn right(&self) -> f32 {
        self.scroll_left + self.width
    }

    pub fn center(&self) -> f32 {
        self.scroll_left + self.width / 2.0
    }
}

/// Fractional months from `epoch` to `date`: whole months plus the elapsed
/// fraction of the month that contains `date`. Negative before the epoch.
pub fn months_since(epoch: NaiveDate, date: NaiveDate) -> f64 {
    let mut whole = i64::from(date.year() - epoch.year()) * 12
        + i64::from(date.month()) - i64::from(epoch.month());
    let mut anchor = add_months(epoch, whole);
    if anchor > date {
        whole -= 1;
        anchor = add_months(epoch, whole);
    }
    let next = add_months(epoch, whole + 1);
    let span = (next - anchor).num_days().max(1) as f64;
    whole as f64 + (date - anchor).num_days() as f64 / span
}

/// Calendar-aware month arithmetic (days clamp to the end of short months).
pub fn add_months(date: NaiveDate, months: i64) -> NaiveDate {
    let magnitude = Months::new(months.unsigned_abs().min(u64::from(u32::MAX)) as u32);
    let shifted = if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    };
    shifted.unwrap_or(date)
}
