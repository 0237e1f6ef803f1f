use aliaspp::{
    AliasError, CommandBuilder, Config, Connector, ExitCode, FlagOptions, Lookup, Registry,
    Result, Store, ValueRequirement,
};
use anyhow::Context;
use argh::FromArgs;
use std::path::PathBuf;
use std::process;

/// Store key holding the branch prefix used by the git aliases.
const PREFIX_KEY: &str = "branch-prefix";
const DEFAULT_PREFIX: &str = "dev";

#[derive(FromArgs)]
/// Expand a programmable alias into a shell command and run it.
struct Cli {
    #[argh(option)]
    /// directory holding the store and alias files; defaults to $ALIASPP_HOME or ~/.aliaspp
    home: Option<PathBuf>,

    #[argh(switch)]
    /// print the composed command instead of running it
    dry_run: bool,

    #[argh(switch)]
    /// write an `alias` line for every alias into <home>/.aliases
    install: bool,

    #[argh(switch)]
    /// list the registered aliases
    list: bool,

    #[argh(positional, greedy)]
    /// alias name followed by its arguments, passed through untouched
    command: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli: Cli = argh::from_env();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            e.downcast_ref::<AliasError>()
                .map(AliasError::exit_code)
                .unwrap_or(1)
        }
    };

    process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::resolve(cli.home.as_deref());
    log::debug!("aliaspp home: {}", config.home.display());

    let mut registry = Registry::new();
    register_defaults(&mut registry)?;
    let literals = config.literals_path();
    if literals.exists() {
        registry
            .load_literals(&literals)
            .with_context(|| format!("loading aliases from {}", literals.display()))?;
    }

    if cli.list {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(0);
    }

    if cli.install {
        let program = invocation(&cli)?;
        let target = config.install_path();
        registry.install(&program, &target)?;
        println!("Add this line to your shell configuration:");
        println!("source {}", target.display());
        return Ok(0);
    }

    let Some((name, args)) = cli.command.split_first() else {
        return Err(AliasError::InvalidArgument("no alias given, see --help".to_owned()).into());
    };

    let store = Store::open(config.store_path()).shared();
    Ok(registry.dispatch(name, args, store, cli.dry_run)?)
}

/// How the shell should call this binary from an installed alias line.
fn invocation(cli: &Cli) -> anyhow::Result<String> {
    let exe = std::env::current_exe().context("locating the aliaspp executable")?;
    let mut program = exe.display().to_string();
    if let Some(home) = &cli.home {
        program.push_str(&format!(" --home {}", home.display()));
    }
    Ok(program)
}

fn register_defaults(registry: &mut Registry) -> Result<()> {
    registry
        .register("gc", checkout)?
        .register("gb", branch)?
        .register("gac", add_commit)?
        .register("prefix", prefix)?
        .register_bases([("mb", "make build"), ("pi", "pip install")], add_alert)?
        .register_literals([("gs", "git status"), ("cls", "clear")])?;
    Ok(())
}

fn branch_prefix(cb: &CommandBuilder) -> String {
    cb.get_from_env(PREFIX_KEY, Some(DEFAULT_PREFIX))
        .unwrap_or_default()
}

// gc              = git checkout master
// gc topic        = git checkout dev/topic
// gc -b topic     = git checkout -b dev/topic
fn checkout(cb: &mut CommandBuilder) -> Result<()> {
    let prefix = branch_prefix(cb);
    cb.base("git checkout");
    cb.if_has_arg(0).update_arg(0, |v| format!("{prefix}/{v}"))?;
    cb.if_not_has_arg(0)
        .if_set("b", ValueRequirement::RequireValue)
        .update_flag("b", |v| format!("{prefix}/{v}"))?;
    cb.if_not_has_arg(0).if_not_set("b").append_arg("master");
    Ok(())
}

// gb              = git branch
// gb -D topic     = git branch -D dev/topic
fn branch(cb: &mut CommandBuilder) -> Result<()> {
    let prefix = branch_prefix(cb);
    cb.base("git branch");
    cb.if_set("D", ValueRequirement::RequireValue)
        .update_flag("D", |v| format!("{prefix}/{v}"))?;
    Ok(())
}

// gac "message"   = git add . && git commit -m "message"
fn add_commit(cb: &mut CommandBuilder) -> Result<()> {
    cb.base("git add . && git commit");
    cb.if_not_set("m").set_flag_from_arg(
        "m",
        0,
        Lookup::required().error("Please provide a commit message"),
    )?;
    Ok(())
}

// prefix NAME     = remember NAME as the branch prefix
// prefix          = show the current one
fn prefix(cb: &mut CommandBuilder) -> Result<()> {
    cb.base("echo");
    cb.if_has_arg(0)
        .set_flag_from_arg("p", 0, Lookup::required())?
        .save_to_env("p", PREFIX_KEY)?
        .remove_flag("p");
    let current = branch_prefix(cb);
    cb.append_arg(format!("branch prefix: {current}").as_str());
    Ok(())
}

// mb --alert      = make build ; terminal-notifier -message "Build Complete"
fn add_alert(cb: &mut CommandBuilder) -> Result<()> {
    cb.if_set("alert", ValueRequirement::Any)
        .remove_flag("alert")
        .append_command("terminal-notifier", Connector::Then)?
        .set_flag_with("message", "Build Complete", FlagOptions::new().dashes(1))?;
    Ok(())
}
