use chrono::{Datelike, NaiveDate};
use fitlog_core::{
    Calibration, DailyEntry, DayTotals, MonthView, Preferences, WeekView,
};
use tabled::builder::Builder;
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "Activity")]
    activity: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "kcal")]
    kcal: u32,
}

#[derive(Tabled)]
struct SetRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Exercise")]
    name: String,
    #[tabled(rename = "Sets x Reps")]
    volume: String,
    #[tabled(rename = "kg")]
    weight: String,
    #[tabled(rename = "Rest (s)")]
    rest: String,
    #[tabled(rename = "MET")]
    met: String,
}

#[derive(Tabled)]
struct WeekRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Step eq.")]
    step_eq: String,
    #[tabled(rename = "kcal")]
    kcal: String,
    #[tabled(rename = "Target")]
    target: String,
}

#[derive(Tabled)]
struct PrefRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

pub fn show_day(entry: &DailyEntry, totals: &DayTotals, target_steps: u32, device_kcal: Option<u32>) {
    let detail = &totals.detail;
    println!(
        "\n\x1b[1;36m{} ({})\x1b[0m  mode: {}",
        entry.date.format("%Y-%m-%d"),
        entry.date.format("%a"),
        detail.evening_mode
    );

    let mut rows = vec![
        ActivityRow {
            activity: "Morning walk".to_string(),
            amount: format!("{} steps", entry.morning_steps),
            kcal: detail.walk_morning_kcal,
        },
        ActivityRow {
            activity: "Evening walk".to_string(),
            amount: format!("{} steps", entry.evening_steps),
            kcal: detail.walk_evening_kcal,
        },
    ];
    if detail.bike_km > 0.0 || detail.bike_kcal > 0 {
        rows.push(ActivityRow {
            activity: "Bike".to_string(),
            amount: format!("{:.1} km / {:.0} min", detail.bike_km, detail.bike_minutes),
            kcal: detail.bike_kcal,
        });
    }
    if detail.resistance_sets > 0 {
        rows.push(ActivityRow {
            activity: "Weights".to_string(),
            amount: format!(
                "{} sets / {:.1} min @ {:.1} MET",
                detail.resistance_sets, detail.weights_minutes, detail.weights_met
            ),
            kcal: detail.weights_kcal,
        });
    }
    println!("{}", styled(Table::new(rows)));

    if !entry.weight_sessions.is_empty() {
        let sets: Vec<SetRow> = entry
            .weight_sessions
            .iter()
            .enumerate()
            .map(|(i, s)| SetRow {
                index: i + 1,
                name: s.name.clone(),
                volume: format!("{} x {}", s.sets, s.reps),
                weight: if s.weight_kg > 0.0 { format!("{:.1}", s.weight_kg) } else { "-".to_string() },
                rest: format!("{:.0}", s.rest_sec),
                met: format!("{:.1}", s.intensity_met),
            })
            .collect();
        println!("{}", styled(Table::new(sets)));
    }

    println!(
        "Morning {} kcal | Evening {} kcal | Total \x1b[1m{} kcal\x1b[0m",
        totals.morning_kcal, totals.evening_kcal, totals.total_kcal
    );
    println!(
        "Step equivalent: \x1b[1m{}\x1b[0m / {} {}",
        totals.step_equivalent,
        target_steps,
        if totals.hits_target(target_steps) { "\x1b[32m(target hit)\x1b[0m" } else { "" }
    );
    if let Some(device) = device_kcal {
        println!("Device-adjusted: ~{} kcal", device);
    }
}

pub fn show_week(week: &WeekView) {
    println!(
        "\n\x1b[1;36mWeek {} .. {}\x1b[0m (target {} steps)",
        week.start,
        week.end(),
        week.target_steps
    );

    let rows: Vec<WeekRow> = week
        .days
        .iter()
        .map(|day| WeekRow {
            date: format!("{} ({})", day.date.format("%m-%d"), day.label),
            step_eq: if day.logged { day.step_equivalent.to_string() } else { "-".to_string() },
            kcal: if day.logged { day.kcal.to_string() } else { "-".to_string() },
            target: if day.logged && day.step_equivalent >= week.target_steps {
                "✔".to_string()
            } else {
                String::new()
            },
        })
        .collect();

    let mut table = styled(Table::new(rows));
    table.with(Modify::new(Columns::new(1..3)).with(Alignment::right()));
    println!("{}", table);
    println!(
        "Total: {} step eq. | {} kcal | {}/7 days on target",
        week.total_step_equivalent(),
        week.total_kcal(),
        week.days_hit_target
    );
}

pub fn show_month(view: &MonthView, today: NaiveDate) {
    let summary = &view.summary;
    println!("\n\x1b[1;36m{:04}-{:02}\x1b[0m", summary.year, summary.month);

    let mut builder = Builder::default();
    builder.push_record(["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
    for week in &view.calendar.weeks {
        builder.push_record(week.iter().map(|cell| {
            let marker = if cell.date == today { "*" } else { "" };
            if !cell.in_month {
                format!("{}", cell.date.day())
            } else if cell.logged {
                let hit = if cell.hit_target { " ✔" } else { "" };
                format!("{}{}{}\n{}", cell.date.day(), marker, hit, compact(cell.step_equivalent))
            } else {
                format!("{}{}\n·", cell.date.day(), marker)
            }
        }));
    }
    println!("{}", styled(builder.build()));

    println!(
        "Logged {} days | {} on target | {} with weights",
        summary.days_logged, summary.days_hit_target, summary.days_with_resistance
    );
    println!(
        "Steps {} | Bike {:.1} km | {} step eq. | {} kcal",
        summary.steps, summary.bike_km, summary.step_equivalent, summary.kcal
    );
}

fn compact(steps: u32) -> String {
    if steps >= 1000 {
        format!("{:.1}k", steps as f64 / 1000.0)
    } else {
        steps.to_string()
    }
}

pub fn show_prefs(prefs: &Preferences) {
    let rows = vec![
        PrefRow { key: "weight (kg)", value: format!("{}", prefs.weight_kg) },
        PrefRow { key: "stepsPerKm", value: format!("{}", prefs.steps_per_km) },
        PrefRow { key: "walkMET", value: format!("{}", prefs.walk_met) },
        PrefRow { key: "cycleMET", value: format!("{}", prefs.cycle_met) },
        PrefRow { key: "cycleSpeed (km/h)", value: format!("{}", prefs.cycle_speed) },
        PrefRow { key: "weightsMET", value: format!("{}", prefs.weights_met) },
        PrefRow { key: "weightsMET policy", value: prefs.weights_met_policy.to_string() },
        PrefRow { key: "useDeviceBias", value: prefs.use_device_bias.to_string() },
        PrefRow { key: "deviceBias", value: format!("{}", prefs.device_bias) },
        PrefRow { key: "dailyTargetSteps", value: prefs.daily_target_steps.to_string() },
    ];
    println!("{}", styled(Table::new(rows)));
}

pub fn show_calibration(calibration: &Calibration, applied: bool) {
    println!("Steps per km: {}", calibration.steps_per_km);
    println!("MET estimate for the walk: {} kcal", calibration.kcal_met);
    match calibration.device_bias {
        Some(bias) => println!("Device bias: {:.3}", bias),
        None => println!("Device bias: - (no device kcal given)"),
    }
    if applied {
        println!("Saved to preferences.");
    } else {
        println!("Re-run with --apply to save.");
    }
}
