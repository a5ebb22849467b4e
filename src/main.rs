//! Arborist - browse an outline in a terminal tree view with selection.

use anyhow::{anyhow, bail, Result};
use arborist::app::App;
use arborist::outline::OutlineReader;
use arborist::{ui, ArboristError, Key, Modifiers, PointerButton, SelectionMode, TreeConfig};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "arborist")]
#[command(about = "A terminal tree view with single and multiple selection", long_about = None)]
struct Args {
    /// Path to the outline file to open
    file: Option<PathBuf>,

    /// Selection mode: single, multiple or none
    #[arg(long, default_value_t = SelectionMode::Multiple)]
    mode: SelectionMode,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Draw vertical rulers between nesting levels
    #[arg(long)]
    rulers: bool,

    /// Do not highlight the row under the pointer
    #[arg(long)]
    no_hover: bool,

    /// Print the fully expanded tree and its selection instead of opening the UI
    #[arg(long)]
    print: bool,

    /// Select an item by path (repeatable)
    #[arg(long, value_name = "ITEM")]
    select: Vec<String>,

    /// Replace the selection with the range between two items
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    range: Option<Vec<String>>,

    /// Veto every selection change involving this item (repeatable)
    #[arg(long, value_name = "ITEM")]
    veto: Vec<String>,

    /// Clear the selection after the other operations
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let file = std::fs::File::create(log_path)
            .map_err(|e| ArboristError::file_open(log_path.clone(), e))?;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting Arborist");
    }

    let config = TreeConfig::default()
        .with_selection_mode(args.mode)
        .with_vertical_rulers(args.rulers)
        .with_hover_highlighting(!args.no_hover);

    if args.print {
        return run_headless(&args, config);
    }

    // Validate path if provided
    if let Some(ref path) = args.file {
        if !path.is_file() {
            eprintln!("Error: File not found: {}", path.display());
            std::process::exit(1);
        }
    }

    if !io::stdout().is_terminal() {
        return Err(ArboristError::Terminal(
            "stdout is not a terminal (use --print for plain output)".to_string(),
        )
        .into());
    }

    let mut app = App::new(config);
    if let Some(path) = args.file {
        app.load_file(path);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    if args.log.is_some() {
        tracing::info!("Arborist exited");
    }

    Ok(())
}

/// Expand the whole outline, apply the requested selection gestures and
/// print the result.
fn run_headless(args: &Args, config: TreeConfig) -> Result<()> {
    let Some(path) = &args.file else {
        bail!("--print needs an outline file");
    };
    let mut app = App::new(config);
    app.load_outline(OutlineReader::read_file(path)?)?;
    app.expand_all()?;

    for item in &args.veto {
        let vetoed = item.clone();
        app.view.on_preview_selection_change(move |change| {
            if *change.item() == vetoed {
                change.cancel();
            }
        });
    }

    for item in &args.select {
        let id = lookup(&app, item)?;
        if !app.view.set_node_selected(id, true)? {
            eprintln!("select {}: not applied", item);
        }
    }

    if let Some([from, to]) = args.range.as_deref() {
        let first = lookup(&app, from)?;
        let last = lookup(&app, to)?;
        if !(app.view.select(first)? && app.view.select_range(last)?) {
            eprintln!("range {} {}: not applied", from, to);
        }
    }

    if args.clear && !app.view.clear_selection() {
        eprintln!("clear: not applied");
    }

    print!("{}", app.listing());
    Ok(())
}

fn lookup(app: &App, item: &str) -> Result<arborist::NodeId> {
    app.node_for(item)
        .ok_or_else(|| anyhow!("No such item: {}", item))
}

fn modifiers_of(modifiers: KeyModifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.contains(KeyModifiers::SHIFT),
        control: modifiers.contains(KeyModifiers::CONTROL),
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if handle_key(app, key) {
                    return Ok(());
                }
            },
            Event::Mouse(mouse) => handle_mouse(app, mouse),
            Event::FocusGained => {
                app.view.on_got_focus();
            },
            Event::FocusLost => app.view.on_lost_focus(),
            _ => {},
        }
    }
}

/// Handle a key event. Returns `true` when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        app.view.on_preview_key_up();
        return false;
    }
    app.view.on_preview_key_down();
    let modifiers = modifiers_of(key.modifiers);

    match key.code {
        // Quit
        KeyCode::Char('q') => return true,

        // Navigation
        KeyCode::Up => app.navigate(Key::Up, modifiers),
        KeyCode::Down => app.navigate(Key::Down, modifiers),
        KeyCode::Home => app.navigate(Key::Home, modifiers),
        KeyCode::End => app.navigate(Key::End, modifiers),
        KeyCode::Char('k') => app.navigate(Key::Up, Modifiers::NONE),
        KeyCode::Char('j') => app.navigate(Key::Down, Modifiers::NONE),
        KeyCode::Char('K') => app.navigate(Key::Up, Modifiers::SHIFT),
        KeyCode::Char('J') => app.navigate(Key::Down, Modifiers::SHIFT),
        KeyCode::Char('g') => app.navigate(Key::Home, Modifiers::NONE),
        KeyCode::Char('G') => app.navigate(Key::End, Modifiers::NONE),

        // Expand / collapse
        KeyCode::Left | KeyCode::Char('h') => app.collapse_focused(),
        KeyCode::Right | KeyCode::Char('l') => app.expand_focused(),

        // Selection
        KeyCode::Char(' ') => app.toggle_focused(),
        KeyCode::Enter => app.select_focused(),
        KeyCode::Char('a') => app.clear_selection(),
        KeyCode::Char('m') => app.cycle_selection_mode(),

        // Features
        KeyCode::Char('y') => app.copy_selection(),
        KeyCode::Char('T') => app.cycle_theme(),
        _ => {},
    }
    false
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let modifiers = modifiers_of(mouse.modifiers);
    match mouse.kind {
        MouseEventKind::Down(button) => {
            let button = match button {
                MouseButton::Left => PointerButton::Primary,
                MouseButton::Right => PointerButton::Secondary,
                MouseButton::Middle => PointerButton::Middle,
            };
            app.mouse_down(button, mouse.column, mouse.row, modifiers);
        },
        MouseEventKind::Drag(MouseButton::Left) => app.mouse_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(),
        MouseEventKind::Moved => app.mouse_moved(mouse.column, mouse.row),
        _ => {},
    }
}
