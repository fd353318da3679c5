#![allow(dead_code)]

use std::cell::Cell;

use udts_screener::domain::error::ScreenerError;
use udts_screener::domain::stock::{
    BiggestTrend, CmpLabel, Direction, InitialTrend, Snapshot, StockRecord, Supertrend, Udts,
};
use udts_screener::ports::snapshot_port::SnapshotPort;

pub const UP: Option<Direction> = Some(Direction::Up);
pub const DOWN: Option<Direction> = Some(Direction::Down);

pub struct MockSnapshotPort {
    pub snapshot: Snapshot,
    pub error: Option<String>,
    pub loads: Cell<usize>,
}

impl MockSnapshotPort {
    pub fn new(stocks: Vec<StockRecord>) -> Self {
        Self {
            snapshot: Snapshot::new(stocks),
            error: None,
            loads: Cell::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            snapshot: Snapshot::default(),
            error: Some(reason.to_string()),
            loads: Cell::new(0),
        }
    }
}

impl SnapshotPort for MockSnapshotPort {
    fn load_snapshot(&self) -> Result<Snapshot, ScreenerError> {
        self.loads.set(self.loads.get() + 1);
        match &self.error {
            Some(reason) => Err(ScreenerError::Snapshot {
                reason: reason.clone(),
            }),
            None => Ok(self.snapshot.clone()),
        }
    }
}

/// Fluent builder for test records.
pub struct RecordBuilder {
    record: StockRecord,
}

pub fn stock(symbol: &str) -> RecordBuilder {
    RecordBuilder {
        record: StockRecord::new(symbol),
    }
}

impl RecordBuilder {
    pub fn sector(mut self, sector: &str) -> Self {
        self.record.sector = Some(sector.to_string());
        self
    }

    pub fn industry(mut self, industry: &str) -> Self {
        self.record.industry = Some(industry.to_string());
        self
    }

    /// Monthly, weekly and daily directions; also sets the triple flags.
    pub fn mwd(
        mut self,
        monthly: Option<Direction>,
        weekly: Option<Direction>,
        daily: Option<Direction>,
    ) -> Self {
        let udts = self.record.udts.get_or_insert_with(Udts::default);
        udts.monthly = monthly;
        udts.weekly = weekly;
        udts.daily = daily;
        self.record.is_triple_up = [monthly, weekly, daily].iter().all(|d| *d == UP);
        self.record.is_triple_down = [monthly, weekly, daily].iter().all(|d| *d == DOWN);
        self
    }

    /// Every all-up/all-down component set to `d`.
    pub fn aligned(self, d: Direction) -> Self {
        let mut b = self.mwd(Some(d), Some(d), Some(d));
        if let Some(udts) = b.record.udts.as_mut() {
            udts.hourly = Some(d);
            udts.fifteen_min = Some(d);
        }
        b.record.biggest_trend = Some(BiggestTrend {
            direction: Some(d),
            ..Default::default()
        });
        b.record.initial_trend = Some(InitialTrend {
            direction: Some(d),
            support: None,
        });
        b.record.cmp_label = Some(CmpLabel::Yes);
        b
    }

    pub fn score(mut self, score: f64) -> Self {
        self.record.scores.total = Some(score);
        self
    }

    pub fn upside(mut self, upside: f64) -> Self {
        self.record.upside = Some(upside);
        self
    }

    pub fn supertrend(mut self, d: Direction) -> Self {
        self.record.daily_supertrend = Some(Supertrend {
            direction: Some(d),
            level: None,
        });
        self
    }

    pub fn fundamentals(mut self, roe: f64, pe: f64, de: f64) -> Self {
        self.record.fundamentals.roe = Some(roe);
        self.record.fundamentals.pe = Some(pe);
        self.record.fundamentals.debt_to_equity = Some(de);
        self
    }

    /// Values that satisfy every quality bound of the built-in presets.
    pub fn quality(mut self) -> Self {
        let f = &mut self.record.fundamentals;
        f.roe = Some(22.0);
        f.pe = Some(30.0);
        f.debt_to_equity = Some(10.0);
        f.revenue_growth = Some(8.0);
        f.earnings_growth = Some(12.0);
        f.net_income_to_common = Some(900.0);
        self.record.two_yr_high_pct = Some(25.0);
        self.record.market_cap = Some(150.0);
        self
    }

    pub fn with(mut self, edit: impl FnOnce(&mut StockRecord)) -> Self {
        edit(&mut self.record);
        self
    }

    pub fn build(self) -> StockRecord {
        self.record
    }
}

pub fn symbols<'a>(rows: impl IntoIterator<Item = &'a StockRecord>) -> Vec<String> {
    rows.into_iter().map(|r| r.symbol.clone()).collect()
}

/// A small mixed snapshot with members and non-members of NIFTY 50.
pub fn sample_snapshot() -> Snapshot {
    Snapshot::new(vec![
        stock("TCS")
            .sector("Technology")
            .industry("IT Services")
            .aligned(Direction::Up)
            .score(85.0)
            .upside(12.0)
            .quality()
            .build(),
        stock("INFY")
            .sector("Technology")
            .industry("IT Services")
            .mwd(UP, UP, DOWN)
            .score(70.0)
            .upside(8.0)
            .quality()
            .build(),
        stock("MINDTREE")
            .sector("Technology")
            .industry("IT Consulting")
            .mwd(UP, UP, UP)
            .score(70.0)
            .upside(15.0)
            .build(),
        stock("ONGC")
            .sector("Energy")
            .industry("Oil & Gas")
            .aligned(Direction::Down)
            .score(20.0)
            .upside(-4.0)
            .build(),
        stock("SUZLON")
            .sector("Energy")
            .industry("Renewables")
            .mwd(DOWN, UP, UP)
            .score(40.0)
            .quality()
            .build(),
        stock("NEWLIST").build(),
    ])
}
