//! 时长换算
//!
//! 时长字符串来自外部 API，解析失败一律按 0 秒处理

/// 把 "M:SS" 或 "H:MM:SS" 解析为秒数，格式不对返回 0
pub fn parse_clock(duration: &str) -> u64 {
    let parts: Option<Vec<u64>> = duration
        .trim()
        .split(':')
        .map(|p| p.trim().parse::<u64>().ok())
        .collect();

    let total = match parts.as_deref() {
        Some([minutes, seconds]) => clock_seconds(0, *minutes, *seconds),
        Some([hours, minutes, seconds]) => clock_seconds(*hours, *minutes, *seconds),
        _ => None,
    };

    // 溢出同样按格式错误处理
    total.unwrap_or(0)
}

fn clock_seconds(hours: u64, minutes: u64, seconds: u64) -> Option<u64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// 把秒数格式化为 "M:SS" 或 "H:MM:SS"
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// 把秒数格式化为 "{h}h {m}m" 或 "{m}m"（丢弃秒）
pub fn format_aggregate(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;

    if hours >= 1 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// 汇总一组时长字符串
///
/// # 示例
/// ```
/// use course_catalog::services::duration::aggregate_duration;
///
/// assert_eq!(aggregate_duration(["1:30", "0:45"]), "2m");
/// assert_eq!(aggregate_duration(["59:00", "2:00"]), "1h 1m");
/// ```
pub fn aggregate_duration<I, S>(durations: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let total = durations
        .into_iter()
        .map(|d| parse_clock(d.as_ref()))
        .fold(0u64, u64::saturating_add);
    format_aggregate(total)
}

/// 把 "{h}h {m}m" / "{m}m" 还原成分钟数（用于比较汇总结果）
#[cfg(test)]
pub(crate) fn aggregate_to_minutes(aggregate: &str) -> u64 {
    aggregate
        .split_whitespace()
        .map(|part| {
            if let Some(h) = part.strip_suffix('h') {
                h.parse::<u64>().unwrap_or(0) * 60
            } else if let Some(m) = part.strip_suffix('m') {
                m.parse::<u64>().unwrap_or(0)
            } else {
                0
            }
        })
        .sum()
}
