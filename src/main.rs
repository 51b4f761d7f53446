#[cfg(not(feature = "dispatch"))]
fn main() {
    eprintln!(
        "The phantom-stage CLI requires the \"dispatch\" feature. Rebuild with default features to enable the console."
    );
}

#[cfg(feature = "dispatch")]
mod cli {
    use std::env;
    use std::io::{self, Read, Write};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use anyhow::Context;
    use parking_lot::Mutex;

    use phantom_stage::audio::ChannelBackend;
    use phantom_stage::config::StageConfig;
    use phantom_stage::console::SecretConsole;
    use phantom_stage::constants::FADE_TICK_MS;
    use phantom_stage::dispatch::StageEffects;
    use phantom_stage::input::KeyPress;
    use phantom_stage::theme::Theme;

    #[cfg(feature = "streaming")]
    use phantom_stage::streaming::{RodioBackend, RodioOutput};

    /// HUD collaborator that renders into the status lines below.
    struct TerminalHud {
        theme: Theme,
        alert: Option<(String, Instant)>,
        rain_burst: f32,
        glyphs: usize,
        trails: usize,
        revealed: bool,
        glitch_until: Option<Instant>,
    }

    impl TerminalHud {
        fn new() -> Self {
            TerminalHud {
                theme: Theme::Matrix,
                alert: None,
                rain_burst: 0.0,
                glyphs: 0,
                trails: 0,
                revealed: false,
                glitch_until: None,
            }
        }

        fn alert_text(&mut self) -> &str {
            if let Some((_, until)) = self.alert {
                if Instant::now() >= until {
                    self.alert = None;
                }
            }
            self.alert.as_ref().map(|(text, _)| text.as_str()).unwrap_or("")
        }

        fn glitching(&self) -> bool {
            self.glitch_until.is_some_and(|until| Instant::now() < until)
        }
    }

    impl StageEffects for TerminalHud {
        fn set_theme(&mut self, theme: Theme) {
            self.theme = theme;
        }
        fn set_alert(&mut self, text: &str, duration_ms: u64) {
            self.alert = Some((
                text.to_string(),
                Instant::now() + Duration::from_millis(duration_ms),
            ));
        }
        fn glitch(&mut self, duration_ms: u64) {
            self.glitch_until = Some(Instant::now() + Duration::from_millis(duration_ms));
        }
        fn set_rain_burst(&mut self, bonus: f32) {
            self.rain_burst = bonus;
        }
        fn spawn_glyph_trail(&mut self, count: usize) {
            self.trails += count;
        }
        fn append_hud_glyphs(&mut self, count: usize) {
            self.glyphs += count;
        }
        fn reveal_sections(&mut self) {
            self.revealed = true;
        }
    }

    struct Shared {
        console: SecretConsole<Box<dyn ChannelBackend + Send>>,
        hud: TerminalHud,
    }

    fn volume_bar(volume: f32, len: usize) -> String {
        let filled = (volume.clamp(0.0, 1.0) * len as f32).round() as usize;
        let mut bar = String::with_capacity(len);
        for i in 0..len {
            bar.push(if i < filled { '█' } else { '░' });
        }
        bar
    }

    /// Map a raw stdin byte to a key press.
    ///
    /// Uppercase letters and digits count as Shift-held so all built-in
    /// codes are typeable from a plain terminal.
    fn keypress_from_byte(byte: u8) -> Option<KeyPress> {
        match byte {
            b'A'..=b'Z' | b'0'..=b'9' => Some(KeyPress::shifted(byte as char)),
            b'a'..=b'z' => Some(KeyPress::plain(byte as char)),
            _ => None,
        }
    }

    #[cfg(unix)]
    fn set_raw_terminal(enable: bool) {
        let (echo, raw) = if enable { ("-echo", "raw") } else { ("echo", "-raw") };
        let _ = std::process::Command::new("stty").arg(echo).arg(raw).status();
    }

    #[cfg(not(unix))]
    fn set_raw_terminal(_enable: bool) {}

    #[cfg(feature = "streaming")]
    fn make_backends(
        output: &RodioOutput,
    ) -> anyhow::Result<(Box<dyn ChannelBackend + Send>, Box<dyn ChannelBackend + Send>)> {
        let primary = RodioBackend::new(output).context("creating primary deck")?;
        let secondary = RodioBackend::new(output).context("creating secondary deck")?;
        Ok((Box::new(primary), Box::new(secondary)))
    }

    pub fn run() -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .init();

        println!("Phantom Stage - Secret Console");
        println!("==============================\n");

        let mut config_arg: Option<String> = None;
        let mut main_track_arg: Option<String> = None;
        let mut show_help = false;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => match args.next() {
                    Some(value) => config_arg = Some(value),
                    None => {
                        eprintln!("--config requires a path argument");
                        show_help = true;
                    }
                },
                "--main-track" => match args.next() {
                    Some(value) => main_track_arg = Some(value),
                    None => {
                        eprintln!("--main-track requires a path argument");
                        show_help = true;
                    }
                },
                "--help" | "-h" => {
                    show_help = true;
                }
                _ => {
                    eprintln!("Unknown flag: {}", arg);
                    show_help = true;
                }
            }
        }

        if show_help {
            eprintln!(
                "Usage:\n  phantom-stage [--config <stage.json>] [--main-track <file>]\n\nFlags:\n  --config <path>      Load codes/tracks/fade timing from a JSON file\n  --main-track <path>  Override the looping main track\n  -h, --help           Show this help\n\nKeys:\n  UPPERCASE letters and digits act as Shift+key (secret codes)\n  lowercase letters feed the stepwise unlock sequence\n  ctrl-c / q           Quit\n"
            );
            return Ok(());
        }

        let mut config = match config_arg {
            Some(path) => StageConfig::load(&path)
                .with_context(|| format!("loading stage config '{}'", path))?,
            None => StageConfig::default(),
        };
        if let Some(track) = main_track_arg {
            config.main_track = track;
        }

        #[cfg(feature = "streaming")]
        let output = RodioOutput::new().context("opening audio output")?;

        #[cfg(feature = "streaming")]
        let (primary, secondary) = make_backends(&output)?;
        #[cfg(not(feature = "streaming"))]
        let (primary, secondary): (
            Box<dyn ChannelBackend + Send>,
            Box<dyn ChannelBackend + Send>,
        ) = (
            Box::new(phantom_stage::audio::NullBackend),
            Box::new(phantom_stage::audio::NullBackend),
        );

        #[cfg(not(feature = "streaming"))]
        println!("(built without the \"streaming\" feature - decks run silently)\n");

        let console = SecretConsole::from_config(&config, primary, secondary)?;
        let shared = Arc::new(Mutex::new(Shared {
            console,
            hud: TerminalHud::new(),
        }));

        println!("{} codes registered. Type away.\n", config.codes.len());

        let running = Arc::new(AtomicBool::new(true));

        // Fade ticker: the periodic scheduler behind all volume ramps.
        let ticker_shared = Arc::clone(&shared);
        let ticker_running = Arc::clone(&running);
        let ticker = std::thread::spawn(move || {
            while ticker_running.load(Ordering::Relaxed) {
                ticker_shared.lock().console.tick();
                std::thread::sleep(Duration::from_millis(FADE_TICK_MS as u64));
            }
        });

        // Raw key reader.
        let (tx, rx) = std::sync::mpsc::channel::<u8>();
        let input_running = Arc::clone(&running);
        std::thread::spawn(move || {
            set_raw_terminal(true);
            let mut stdin = io::stdin();
            let mut buf = [0u8; 1];
            while input_running.load(Ordering::Relaxed) {
                if stdin.read_exact(&mut buf).is_ok() {
                    let _ = tx.send(buf[0]);
                    if buf[0] == b'\x03' {
                        break;
                    }
                }
            }
            set_raw_terminal(false);
        });

        print!("\x1B[?25l");
        for _ in 0..4 {
            println!();
        }

        loop {
            std::thread::sleep(Duration::from_millis(100));

            while let Ok(byte) = rx.try_recv() {
                if byte == b'q' || byte == b'\x03' {
                    running.store(false, Ordering::Relaxed);
                    break;
                }
                if let Some(press) = keypress_from_byte(byte) {
                    let mut guard = shared.lock();
                    let Shared { console, hud } = &mut *guard;
                    console.handle_key(&press, hud);
                }
            }

            {
                let mut guard = shared.lock();
                let (primary_volume, secondary_volume, transitioning) = {
                    let audio = guard.console.audio();
                    (
                        audio.primary().volume(),
                        audio.secondary().volume(),
                        audio.is_transitioning(),
                    )
                };
                let storm = guard.console.dispatcher().storm_active();
                let theme = guard.hud.theme;
                let rain = guard.hud.rain_burst;
                let glyphs = guard.hud.glyphs + guard.hud.trails;
                let revealed = guard.hud.revealed;
                let glitch = guard.hud.glitching();
                let alert = guard.hud.alert_text().to_string();

                print!("\x1B[4A");
                print!(
                    "\x1B[2K\rTheme: {:<8} rain {:<7} burst {:+.1} {}\n",
                    theme.label(),
                    theme.rain_color(),
                    rain,
                    if storm { "[STORM]" } else { "" },
                );
                print!(
                    "\x1B[2K\rMAIN   {} {:>4.0}%{}\n",
                    volume_bar(primary_volume, 20),
                    primary_volume * 100.0,
                    if transitioning { "  ~fading~" } else { "" },
                );
                print!(
                    "\x1B[2K\rSECRET {} {:>4.0}%  glyphs {}{}\n",
                    volume_bar(secondary_volume, 20),
                    secondary_volume * 100.0,
                    glyphs,
                    if revealed { "  [REVEALED]" } else { "" },
                );
                print!(
                    "\x1B[2K\r>> {}{}\n",
                    alert,
                    if glitch { " ⚡" } else { "" },
                );
                io::stdout().flush().ok();
            }

            if !running.load(Ordering::Relaxed) {
                break;
            }
        }

        set_raw_terminal(false);
        println!("\x1B[?25h");
        io::stdout().flush().ok();

        running.store(false, Ordering::Relaxed);
        ticker.join().expect("Fade ticker panicked during shutdown");

        println!("\nConsole closed.");
        Ok(())
    }
}

#[cfg(feature = "dispatch")]
fn main() -> anyhow::Result<()> {
    cli::run()
}
