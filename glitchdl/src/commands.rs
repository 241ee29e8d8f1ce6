use crate::handlers::EXAMPLE_URL;
use clap::arg;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("glitchdl")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("glitchdl")
        .about(
            "Downloads a hosted page and its image, audio and a-asset-item files into \
            ./glitch_download for offline use",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!(<URL>)
                .required(true)
                .help("Absolute URL of the page to archive")
                .value_parser(clap::value_parser!(Url)),
        )
        .after_help(format!("Example:\n  glitchdl {}", EXAMPLE_URL))
}
