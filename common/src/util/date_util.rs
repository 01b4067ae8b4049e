use chrono::DateTime;

/// 当前毫秒时间戳
pub fn now_millis() -> i64 {
    let now = chrono::Local::now();
    now.timestamp_millis()
}

pub fn time_to_str(time_millis: i64) -> String {
    let t = DateTime::from_timestamp_millis(time_millis).expect("非法的时间戳");
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}
