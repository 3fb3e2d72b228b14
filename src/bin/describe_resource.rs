//! Print the description document of one resource in a model file.
//!
//! Loads a registration model and its text bundles, assembles the description
//! for the requested address and locale, and prints it as JSON on stdout.
//! Diagnostics go to stderr; set `RESDESC_LOG` (an `EnvFilter` directive) to
//! see assembly traces.

use anyhow::{Context, Result, anyhow, bail};
use resdesc::{
    BundleCatalog, Depth, DescribeOptions, GrouplessOrder, Locale, PathAddress, RegistrationTree,
    description_schema, describe_address, resolver_for_address,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "RESDESC_LOG";
const DEFAULT_BUNDLE_NAME: &str = "messages";

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;

    let mut options = DescribeOptions::from_env()?;
    if let Some(groupless) = args.groupless {
        options = options.with_groupless(groupless);
    }

    let tree = RegistrationTree::load(&args.model)?;
    let catalog = Arc::new(
        BundleCatalog::load_dir(&args.bundles, &args.bundle_name)
            .with_context(|| format!("loading bundles from {}", args.bundles.display()))?,
    );
    let resolver = resolver_for_address(&tree, &args.address, catalog, &args.prefix)?;
    let document = describe_address(
        &tree,
        &args.address,
        &resolver,
        &args.locale,
        &options,
        args.depth,
    )?;

    if args.validate {
        description_schema()?.validate(&document)?;
    }

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{rendered}");
    Ok(())
}

struct CliArgs {
    model: PathBuf,
    bundles: PathBuf,
    bundle_name: String,
    prefix: String,
    locale: Locale,
    address: PathAddress,
    depth: Depth,
    groupless: Option<GrouplessOrder>,
    validate: bool,
    pretty: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut model: Option<PathBuf> = None;
        let mut bundles: Option<PathBuf> = None;
        let mut bundle_name: Option<String> = None;
        let mut prefix: Option<String> = None;
        let mut locale: Option<Locale> = None;
        let mut address: Option<PathAddress> = None;
        let mut recursive = false;
        let mut depth: Option<usize> = None;
        let mut groupless: Option<GrouplessOrder> = None;
        let mut validate = false;
        let mut pretty = false;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--model" => model = Some(PathBuf::from(next_value(&mut args, "--model")?)),
                "--bundles" => bundles = Some(PathBuf::from(next_value(&mut args, "--bundles")?)),
                "--bundle-name" => bundle_name = Some(next_value(&mut args, "--bundle-name")?),
                "--prefix" => prefix = Some(next_value(&mut args, "--prefix")?),
                "--locale" => {
                    let raw = next_value(&mut args, "--locale")?;
                    locale = Some(raw.parse().with_context(|| format!("invalid --locale {raw}"))?);
                }
                "--address" => {
                    let raw = next_value(&mut args, "--address")?;
                    address =
                        Some(raw.parse().with_context(|| format!("invalid --address {raw}"))?);
                }
                "--recursive" => recursive = true,
                "--depth" => {
                    let raw = next_value(&mut args, "--depth")?;
                    let levels = raw
                        .parse()
                        .with_context(|| format!("--depth must be a non-negative integer: {raw}"))?;
                    depth = Some(levels);
                }
                "--groupless" => {
                    groupless = Some(next_value(&mut args, "--groupless")?.parse()?);
                }
                "--validate" => validate = true,
                "--pretty" => pretty = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}"),
            }
        }

        let Some(model) = model else {
            bail!("--model is required\n{}", usage());
        };
        let Some(bundles) = bundles else {
            bail!("--bundles is required\n{}", usage());
        };

        let depth = match (recursive, depth) {
            (_, Some(levels)) => Depth::Limited(levels),
            (true, None) => Depth::Unbounded,
            (false, None) => Depth::Limited(0),
        };

        Ok(CliArgs {
            model,
            bundles,
            bundle_name: bundle_name.unwrap_or_else(|| DEFAULT_BUNDLE_NAME.to_string()),
            prefix: prefix.unwrap_or_default(),
            locale: locale.unwrap_or_default(),
            address: address.unwrap_or_default(),
            depth,
            groupless,
            validate,
            pretty,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = std::ffi::OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: describe-resource --model PATH --bundles DIR [--bundle-name NAME] [--prefix KEY] [--locale TAG] [--address /key=value/...] [--recursive] [--depth N] [--groupless first|last] [--validate] [--pretty]\n\
Describes the resource at --address (default: root) in --locale (default: root bundle) and prints the document as JSON.\n\
--recursive fills every child modelDescription; --depth N stops after N levels.\n"
}

fn print_usage() {
    print!("{}", usage());
}
