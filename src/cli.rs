use clap::{Parser, crate_description, crate_name, crate_version};
use std::ffi::OsString;

#[derive(Debug, Parser)]
#[command(name = crate_name!(), about = crate_description!(), version = crate_version!())]
pub struct Opts {
    /// Run mode: `genData` or `convertData`.
    #[arg(short = 't', long = "type", default_value = "")]
    pub kind: String,
    /// Number of personas to generate (genData only).
    #[arg(short = 'q', long = "qnt", default_value_t = 0)]
    pub quantity: usize,
}

/// Rewrite single-dash long flags (`-type`, `-qnt`, `-type=x`) into the
/// double-dash form clap expects.
pub fn legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(s) if is_legacy_flag(s) => OsString::from(format!("-{s}")),
            _ => arg,
        })
        .collect()
}

fn is_legacy_flag(s: &str) -> bool {
    let name = s.split('=').next().unwrap_or(s);
    name == "-type" || name == "-qnt"
}
