use std::process::ExitCode;
use std::sync::Arc;

use slimline::error::Result;
use slimline::hooks::Hooks;
use slimline::templating::MiniJinjaEngine;
use slimline::Theme;

use crate::fixture::Fixture;

mod fixture;

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Classify and render one request against a slimline theme.
        cmd wren {
            /// Print the classified context of a request as JSON.
            cmd classify {
                /// Site fixture (TOML or JSON).
                required site: PathBuf
                /// Request fixture (TOML or JSON).
                required request: PathBuf
            }

            /// Render the page template of a request to stdout.
            cmd render {
                required site: PathBuf
                required request: PathBuf
                /// Theme root; child first, then parents. Defaults to `.`.
                repeated -t, --theme theme: PathBuf
            }
        }
    }
}

fn classify(cmd: flags::Classify) -> Result<String> {
    let fixture = Fixture::load(&cmd.site, &cmd.request)?;
    let hooks = Hooks::new();
    let context = slimline::context::Classifier::new(&fixture.site, &fixture.request, &hooks)
        .classify();

    Ok(serde_json::to_string_pretty(&context)?)
}

fn render(cmd: flags::Render) -> Result<String> {
    let fixture = Fixture::load(&cmd.site, &cmd.request)?;
    let roots = if cmd.theme.is_empty() {
        vec![std::path::PathBuf::from(".")]
    } else {
        cmd.theme
    };

    let theme = Theme::open(Arc::new(fixture.site), fixture.request, Arc::new(Hooks::new()), &roots)?;
    MiniJinjaEngine::new(Arc::new(theme)).render_page()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let result = match flags::Wren::from_env_or_exit().subcommand {
        flags::WrenCmd::Classify(cmd) => classify(cmd),
        flags::WrenCmd::Render(cmd) => render(cmd),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
