#[cfg(not(feature = "export-wav"))]
fn main() {
    eprintln!(
        "psg-render requires the \"export-wav\" feature. Rebuild with `--features export-wav` to enable rendering."
    );
}

#[cfg(feature = "export-wav")]
mod cli {
    use std::env;
    use std::fs;

    use anyhow::{bail, Context, Result};
    use tracing::{info, Level};
    use tracing_subscriber::util::SubscriberInitExt;

    use huc6280_psg::{
        ChannelStates, OutputMode, PsgConfig, Register, SampleRepresentation, SoundSystem,
        WavSink,
    };

    const TICKS_PER_SECOND: u32 = 60;
    const DIRECT_CHANNEL: usize = 1;
    const NOISE_CHANNEL: usize = 5;
    // Keep the DDA queue short so the ramp tracks the tick rate
    const DIRECT_BACKLOG: u32 = 256;

    const USAGE: &str = "Usage:\n  psg-render [options] <output.wav>\n\nOptions:\n  --seconds <n>       Length of the render (default 4)\n  --rate <hz>         Output sample rate (default 44100)\n  --config <file>     Load PSG configuration from JSON\n  --mono              Mono output\n  --signed            Sign-extend channel samples before mixing\n  --dump-state <file> Write the final channel state as JSON\n  -v, --verbose       Debug logging\n  -h, --help          Show this help\n";

    struct Args {
        output: String,
        seconds: u32,
        config: PsgConfig,
        dump_state: Option<String>,
        verbose: bool,
    }

    fn parse_args() -> Result<Option<Args>> {
        let mut output = None;
        let mut seconds = 4;
        let mut rate = None;
        let mut config_path = None;
        let mut mono = false;
        let mut signed = false;
        let mut dump_state = None;
        let mut verbose = false;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seconds" => {
                    let value = args.next().context("--seconds requires a value")?;
                    seconds = value
                        .parse()
                        .with_context(|| format!("invalid --seconds value '{value}'"))?;
                }
                "--rate" => {
                    let value = args.next().context("--rate requires a value")?;
                    rate = Some(
                        value
                            .parse::<u32>()
                            .with_context(|| format!("invalid --rate value '{value}'"))?,
                    );
                }
                "--config" => config_path = Some(args.next().context("--config requires a path")?),
                "--dump-state" => {
                    dump_state = Some(args.next().context("--dump-state requires a path")?)
                }
                "--mono" => mono = true,
                "--signed" => signed = true,
                "-v" | "--verbose" => verbose = true,
                "-h" | "--help" => return Ok(None),
                _ if arg.starts_with('-') => bail!("unknown flag: {arg}"),
                _ => output = Some(arg),
            }
        }

        let Some(output) = output else {
            return Ok(None);
        };

        let mut config = match config_path {
            Some(path) => {
                let json = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config '{path}'"))?;
                PsgConfig::from_json(&json)
                    .with_context(|| format!("failed to load config '{path}'"))?
            }
            None => PsgConfig::default(),
        };
        if let Some(rate) = rate {
            config.sample_rate = rate;
        }
        if mono {
            config.output = OutputMode::Mono;
        }
        if signed {
            config.representation = SampleRepresentation::Signed;
        }

        Ok(Some(Args {
            output,
            seconds,
            config,
            dump_state,
            verbose,
        }))
    }

    /// Square wave on channel 0, direct-audio sawtooth on channel 1, noise
    /// on channel 5.
    fn program_demo(system: &mut SoundSystem<WavSink>) -> Result<()> {
        let psg = system.psg_mut();
        psg.set_global_volume(0xFF);

        // Channel 0 through the port, the way a CPU would
        psg.write_port(Register::ChannelSelect.addr(), 0);
        psg.write_port(Register::Control.addr(), 0x00);
        for i in 0..32u8 {
            psg.write_port(Register::WaveData.addr(), if i < 16 { 0x1F } else { 0x00 });
        }
        psg.write_port(Register::FreqLo.addr(), 0xFE);
        psg.write_port(Register::FreqHi.addr(), 0x00);
        psg.write_port(Register::Balance.addr(), 0xFB);
        psg.write_port(Register::Control.addr(), 0x98);

        psg.write_register(DIRECT_CHANNEL, Register::Balance, 0xBF)?;
        psg.write_register(DIRECT_CHANNEL, Register::Control, 0xD4)?;

        psg.write_register(NOISE_CHANNEL, Register::Balance, 0xFF)?;
        psg.write_register(NOISE_CHANNEL, Register::Noise, 0x98)?;
        Ok(())
    }

    fn feed_direct_audio(system: &mut SoundSystem<WavSink>, phase: &mut u8) -> Result<()> {
        let psg = system.psg_mut();
        while psg.pending_direct_samples(DIRECT_CHANNEL)? < DIRECT_BACKLOG {
            psg.push_direct_sample(DIRECT_CHANNEL, *phase)?;
            *phase = (*phase + 1) & 0x1F;
        }
        Ok(())
    }

    pub fn run() -> Result<()> {
        let Some(args) = parse_args()? else {
            eprint!("{USAGE}");
            return Ok(());
        };

        tracing_subscriber::fmt()
            .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
            .compact()
            .finish()
            .init();

        let tick = (args.config.sample_rate / TICKS_PER_SECOND).max(1) as usize;
        let config = args
            .config
            .with_max_samples_per_tick(tick.max(args.config.max_samples_per_tick));

        let mut system = SoundSystem::init(config, WavSink::new(&args.output))
            .with_context(|| format!("failed to open '{}'", args.output))?;
        program_demo(&mut system)?;

        let total_ticks = args.seconds * TICKS_PER_SECOND;
        let mut ramp = 0u8;
        for t in 0..total_ticks {
            feed_direct_audio(&mut system, &mut ramp)?;

            // Noise only in the second half
            let noise_volume = if t >= total_ticks / 2 { 0x8F } else { 0x00 };
            system
                .psg_mut()
                .write_register(NOISE_CHANNEL, Register::Control, noise_volume)?;

            system.update(tick).context("render failed")?;
        }

        if let Some(path) = &args.dump_state {
            let states = ChannelStates::capture(system.psg());
            let json = serde_json::to_string_pretty(&states)?;
            fs::write(path, json).with_context(|| format!("failed to write '{path}'"))?;
        }

        let frames = system.frames_rendered();
        system.shutdown().context("failed to finalize WAV file")?;
        info!(
            output = %args.output,
            frames,
            seconds = args.seconds,
            "render complete"
        );
        Ok(())
    }
}

#[cfg(feature = "export-wav")]
fn main() -> anyhow::Result<()> {
    cli::run()
}
