mod ui;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use natya::achievements::{
    load_achievements, AchievementLedger, AchievementStore, GuruScore, JsonAchievementStore,
};
use natya::core::{Settings, UI_FRAME_MS};
use natya::detection::{Clock, DetectionEngine, RngRandom, SystemClock};
use natya::practice::{record_outcome, BeatSync, PracticeSession};
use natya::roadmap::{RoadmapClient, RoadmapError, RoadmapNode, RoadmapRequest};
use natya::utils::{build_info, logger, persistence};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use ui::practice_scene::{draw_practice_scene, PracticeView};

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--roadmap" => {
                let code = match print_roadmap(&Settings::load()) {
                    Ok(()) => 0,
                    Err(e) => {
                        eprintln!("Could not fetch roadmap: {}", e);
                        1
                    }
                };
                std::process::exit(code);
            }
            "--help" | "-h" => {
                println!("Natya - Ghungroo Rhythm Practice\n");
                println!("Usage: natya [option]\n");
                println!("Options:");
                println!("  --roadmap  Print a learning roadmap for your achievements");
                println!("  --version  Show version information");
                println!("  --help     Show this help message");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'natya --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    let mut settings = Settings::load();
    let log_path = persistence::save_path(logger::LOG_FILE)?;
    if let Err(e) = logger::init(&log_path, settings.log_filter()) {
        eprintln!("Warning: logging disabled ({})", e);
    }
    log::info!("{} starting", build_info::version_line());

    let store = JsonAchievementStore::default_location()?;
    let mut ledger = store.load();

    let clock = SystemClock::new();
    let engine = DetectionEngine::new(RngRandom::thread(), clock);
    let mut session = match PracticeSession::with_level(engine, settings.starting_level) {
        Ok(session) => session,
        Err(e) => {
            log::warn!("settings: {}; starting at Basic", e);
            PracticeSession::new(DetectionEngine::new(RngRandom::thread(), clock))
        }
    };
    let mut beat = BeatSync::new(clock.now_ms());
    let mut beat_rng = RngRandom::thread();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(
        &mut terminal,
        &mut session,
        &mut beat,
        &mut beat_rng,
        &mut ledger,
        &store,
        &mut settings,
    );

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    log::info!("exiting");
    result
}

fn print_roadmap(settings: &Settings) -> Result<(), RoadmapError> {
    let ledger = load_achievements();
    let request = RoadmapRequest::from_ledger(&ledger);
    let roadmap = RoadmapClient::new(settings.roadmap_endpoint.as_str()).fetch(&request)?;
    if roadmap.nodes.is_empty() {
        println!("No roadmap suggestions yet.");
    }
    for node in &roadmap.nodes {
        print_node(node);
    }
    Ok(())
}

fn print_node(node: &RoadmapNode) {
    let mark = if node.is_completed { "x" } else { " " };
    let days = node
        .time_required_days()
        .map(|d| format!(", {} days", d))
        .unwrap_or_default();
    println!(
        "[{}] {} ({:.0}%{})",
        mark, node.title, node.current_progress, days
    );
    if !node.description.is_empty() {
        println!("    {}", node.description);
    }
    for tip in &node.recommendations {
        println!("    - {}", tip);
    }
    let stats = node.projected_stats;
    println!(
        "    gains: {} mudras, {} dances, {} poses, +{} score",
        stats.mudras, stats.dances, stats.poses, stats.score
    );
    if let Some(link) = &node.practice_link {
        println!("    practice: {}", link);
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut PracticeSession<RngRandom<rand::rngs::ThreadRng>, SystemClock>,
    beat: &mut BeatSync,
    beat_rng: &mut RngRandom<rand::rngs::ThreadRng>,
    ledger: &mut AchievementLedger,
    store: &JsonAchievementStore,
    settings: &mut Settings,
) -> io::Result<()> {
    let mut status: Option<String> = None;
    loop {
        let now_ms = session.engine().now_ms();
        beat.update(now_ms, beat_rng);

        if let Some(outcome) = session.poll() {
            match record_outcome(&outcome, ledger, store) {
                Ok(true) => status = Some("Achievement saved.".to_string()),
                Ok(false) => {}
                Err(e) => status = Some(format!("Could not save achievement: {}", e)),
            }
        }

        let view = PracticeView {
            tier: session.tier(),
            phase: session.phase(),
            percentage: session.percentage(),
            beat: beat.beat(),
            outcome: session.outcome(),
            score: GuruScore::from_ledger(ledger, Utc::now()),
            status: status.clone(),
        };
        terminal.draw(|f| draw_practice_scene(f, &view))?;

        if !event::poll(Duration::from_millis(UI_FRAME_MS))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                session.cancel_attempt();
                return Ok(());
            }
            KeyCode::Enter => {
                session.start_attempt();
                status = None;
            }
            KeyCode::Char('c') => session.cancel_attempt(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let level = c.to_digit(10).unwrap_or(0) as u8;
                if session.is_running() {
                    status = Some("Finish or cancel the attempt before changing level.".to_string());
                } else {
                    status = match session.set_level(level) {
                        Ok(tier) => {
                            settings.starting_level = tier.level();
                            if let Err(e) = settings.save() {
                                log::warn!("could not save settings: {}", e);
                            }
                            Some(format!("{} level selected.", tier))
                        }
                        Err(e) => Some(e.to_string()),
                    };
                }
            }
            _ => {}
        }
    }
}
