use crate::constants::backup;
use chrono::{Local, NaiveDate};

/// 时间源抽象，便于测试时注入固定日期
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// 系统本地时钟
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// 固定日期时钟，测试用
#[derive(Debug, Clone)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// 格式化备份目录用的日期戳（YYYY-MM-DD）
pub fn date_stamp(date: NaiveDate) -> String {
    date.format(backup::DATE_STAMP_FORMAT).to_string()
}

/// 解析备份目录名为日期，非日期目录返回 None
pub fn parse_date_stamp(name: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(name, backup::DATE_STAMP_FORMAT).ok()
}
