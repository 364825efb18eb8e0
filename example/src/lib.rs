mod app;
mod clock;

use std::time::Instant;

use tracing::info;

use crate::{app::App, clock::FrameClock};

/// Runs the scripted calendar walkthrough and logs what happens.
pub fn run() {
    swipecal_ui::init_tracing_with("warn,example=info,swipecal_components=info");

    let mut clock = FrameClock::new(Instant::now());
    let mut app = App::new(clock.now());
    app.layout(clock.now());
    clock.run_until_idle(|now| app.tick(now));

    app.swipe_to_next_month(&mut clock);
    app.tap_previous_arrow(&mut clock);
    app.pull_to_refresh(&mut clock);
    app.press_days(&mut clock);
    app.sync_current(&mut clock);

    info!(month = %app.displayed_month(), "walkthrough finished");
    println!("{}", app.render_text());
}
