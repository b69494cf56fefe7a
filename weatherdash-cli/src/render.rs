use weatherdash_core::{CurrentView, DailyView, HourlyView, IconCategory, present::hourly_title};

fn glyph(icon: IconCategory) -> &'static str {
    match icon {
        IconCategory::Sun => "☀",
        IconCategory::Moon => "☾",
        IconCategory::CloudSun | IconCategory::CloudMoon => "⛅",
        IconCategory::Cloud => "☁",
        IconCategory::CloudRain => "🌧",
        IconCategory::CloudSunRain | IconCategory::CloudMoonRain => "🌦",
        IconCategory::Bolt => "⚡",
        IconCategory::Snow => "❄",
        IconCategory::Smog => "🌫",
    }
}

pub fn print_current(view: &CurrentView) {
    println!("{}", view.place);
    println!("{}", view.date);
    println!();
    println!("  {}  {}  {}", glyph(view.icon), view.temperature, view.description);
    println!("  Feels like  {}", view.feels_like);
    println!("  Humidity    {}", view.humidity);
    println!("  Wind        {}", view.wind);
    println!("  Visibility  {}", view.visibility);
}

pub fn print_daily(days: &[DailyView]) {
    println!("5-Day Forecast");
    for line in days.iter().map(daily_line) {
        println!("{line}");
    }
}

fn daily_line(day: &DailyView) -> String {
    format!(
        "  [{}] {:<10} {:<7} {} {:>5}  {}",
        day.day_index,
        day.label,
        day.date,
        glyph(day.icon),
        day.temperature,
        day.description
    )
}

pub fn print_hourly(day: &DailyView, hours: &[HourlyView]) {
    println!("{}", hourly_title(day));
    for line in hours.iter().map(hourly_line) {
        println!("{line}");
    }
}

fn hourly_line(hour: &HourlyView) -> String {
    let rain = if hour.is_precipitating { "☂" } else { " " };
    format!(
        "  {rain} {:>8}  {} {:>5}  {:<20} hum {:>4}  wind {:>6}  precip {:>4}",
        hour.time,
        glyph(hour.icon),
        hour.temperature,
        hour.description,
        hour.humidity,
        hour.wind,
        hour.precipitation
    )
}
