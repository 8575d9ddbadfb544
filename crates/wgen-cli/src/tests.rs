use clap::Parser as _;

use super::*;
use crate::demo::{Color, Tree};

fn parse(args: &[&str]) -> Opts {
    let cli = Cli::try_parse_from(std::iter::once("wgen").chain(args.iter().copied())).unwrap();
    match cli.cmd {
        Cmd::Sample(opts) | Cmd::Freq(opts) => opts,
        cmd => panic!("expected sample or freq, got {cmd:?}"),
    }
}

fn config() -> Config {
    toml::from_str(
        r#"
        seed = 1
        size = 7
        samples = 3
        base_depth = 2

        [weights]
        tree = [4, 1]
        "#,
    )
    .unwrap()
}

#[test]
fn flags_override_config() {
    let opts = parse(&["sample", "tree", "--size", "12", "--weights", "2,5", "-d", "4"]);
    let settings = Settings::merge(&opts, config(), 10);
    assert_eq!(settings.size, 12);
    assert_eq!(settings.depth, 4);
    assert_eq!(settings.seed, 1);
    assert_eq!(settings.count, 3);
    assert_eq!(settings.weights::<Tree>().unwrap().as_slice(), [2, 5]);
}

#[test]
fn config_overrides_declared() {
    let settings = Settings::merge(&parse(&["sample", "tree"]), config(), 10);
    assert_eq!((settings.size, settings.depth), (7, 2));
    assert_eq!(settings.weights::<Tree>().unwrap().as_slice(), [4, 1]);
    // Types missing from the config keep their declared weights.
    assert_eq!(settings.weights::<Color>().unwrap(), Weights::declared());
}

#[test]
fn defaults_without_config() {
    let settings = Settings::merge(&parse(&["freq", "tree", "--samples", "8"]), Config::default(), 10);
    assert_eq!(settings.count, 8);
    assert_eq!(settings.size, Context::default().size());
    assert_eq!(settings.depth, 5);
    assert_eq!(settings.strategy, Strategy::Base);
    assert_eq!(settings.weights::<Tree>().unwrap().as_slice(), [1, 3]);
}

#[test]
fn bad_flag_weights_are_reported() {
    let settings = Settings::merge(&parse(&["sample", "tree", "--weights", "1,2,3"]), Config::default(), 10);
    let err = settings.weights::<Tree>().unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"expected 2 weights for `Tree`, one per constructor, found 3"
    );
}

#[test]
fn freq_counts_outermost_constructors() {
    let opts = parse(&[
        "freq", "color", "--weights", "0,1,0", "-n", "200", "--seed", "3", "--strategy", "unsized",
    ]);
    let settings = Settings::merge(&opts, Config::default(), 10_000);
    let Frequencies { counts, depths } = frequencies::<Color>(&settings).unwrap();
    assert_eq!(counts, [0, 200, 0]);
    assert!(depths.iter().all(|&d| d == 0));

    let opts = parse(&["freq", "tree", "-n", "500", "--seed", "3", "--size", "6"]);
    let settings = Settings::merge(&opts, Config::default(), 10_000);
    let Frequencies { counts, depths } = frequencies::<Tree>(&settings).unwrap();
    assert_eq!(counts.iter().sum::<usize>(), 500);
    assert!(counts.iter().all(|&c| c > 0), "{counts:?}");
    assert!(depths.iter().all(|&d| d <= 6), "{depths:?}");
}
