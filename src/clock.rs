//! Date and time prefill helpers

use chrono::{Local, Timelike};

/// Current date as dd.mm.yyyy
pub fn current_date() -> String {
    Local::now().format("%d.%m.%Y").to_string()
}

/// Current time as HH:MM, optionally rounded to the nearest ten minutes
pub fn current_time_rounded(round: bool) -> String {
    let now = Local::now();
    let (hours, minutes) = if round {
        rounded(now.hour(), now.minute())
    } else {
        (now.hour(), now.minute())
    };
    format!("{hours:02}:{minutes:02}")
}

/// Round minutes to the nearest ten, carrying 60 into the next hour
fn rounded(hours: u32, minutes: u32) -> (u32, u32) {
    let mut minutes = ((minutes + 5) / 10) * 10;
    let mut hours = hours;
    if minutes == 60 {
        minutes = 0;
        hours = (hours + 1) % 24;
    }
    (hours, minutes)
}
