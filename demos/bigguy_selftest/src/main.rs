use anyhow::{Context, Result};
use bigguy_io::{read_values, write_values, Codec};
use bigguy_math::{BigGuy, CompactGuy, FixedPoint};
use clap::{Parser, ValueEnum};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const TWO_POW_32: f64 = 4294967296.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// 64.64, four 32-bit limbs
    Wide,
    /// 32.32, one 64-bit word
    Compact,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Write, read back and exercise fixed-point values")]
struct Args {
    /// Scratch file for the serialization check
    #[arg(long, default_value = "bigguy.bin")]
    path: PathBuf,

    /// Representation to test
    #[arg(long, value_enum, default_value_t = Backend::Wide)]
    backend: Backend,

    /// Keep the scratch file instead of deleting it
    #[arg(long)]
    keep: bool,
}

/// One arithmetic check: `x op y == expected`.
struct Scenario {
    name: &'static str,
    x: f64,
    y: f64,
    op: Op,
    expected: f64,
}

#[derive(Clone, Copy)]
enum Op {
    Add,
    Sub,
    AddMult(i64),
}

fn s(name: &'static str, x: f64, op: Op, y: f64, expected: f64) -> Scenario {
    Scenario { name, x, y, op, expected }
}

fn scenarios() -> Vec<Scenario> {
    vec![
        s("0x7fff0000 + 0xffff", 0x7fff0000 as f64, Op::Add, 0xffff as f64, 0x7fffffff as f64),
        s("0x7f000000 + 0xff0000", 0x7f000000 as f64, Op::Add, 0xff0000 as f64, 0x7fff0000 as f64),
        s("0xff + 0xff00", 0xff as f64, Op::Add, 0xff00 as f64, 0xffff as f64),
        s("0xffff + 0xffff", 0xffff as f64, Op::Add, 0xffff as f64, 0x1fffe as f64),
        s("0x10000 - 1", 65536.0, Op::Sub, 1.0, 65535.0),
        s("0xffff * 2", 0.0, Op::AddMult(2), 0xffff as f64, 131070.0),
        s(
            "carry from flo to fhi",
            0.0,
            Op::AddMult(2),
            0xffff as f64 / TWO_POW_32,
            0x1fffe as f64 / TWO_POW_32,
        ),
        s(
            "carry from fhi to ilo",
            0.0,
            Op::AddMult(2),
            0xffff as f64 / 65536.0,
            0x1fffe as f64 / 65536.0,
        ),
        s("0 == -1 * 0", 0.0, Op::AddMult(0), -1.0, 0.0),
        s("0 == 0 * -1", 0.0, Op::AddMult(-1), 0.0, 0.0),
        s(
            "sign change",
            0.0,
            Op::AddMult(-1),
            0xfffff as f64 + 0xfffff as f64 / 1048576.0,
            -(0xfffff as f64 + 0xfffff as f64 / 1048576.0),
        ),
        s(
            "0x0.ffff + 0x0.00ff",
            0xffff as f64 / 65536.0,
            Op::Add,
            0xff as f64 / 65536.0,
            0x100fe as f64 / 65536.0,
        ),
        s(
            "0x0.0000ffff + 0x0.00000001",
            0xffff as f64 / TWO_POW_32,
            Op::Add,
            1.0 / TWO_POW_32,
            0x10000 as f64 / TWO_POW_32,
        ),
        s(
            "0xffff.ffffffff + 0x0.00000001",
            65535.0 + 0xffffffff_u32 as f64 / TWO_POW_32,
            Op::Add,
            1.0 / TWO_POW_32,
            65536.0,
        ),
        s("0xfffff - 0x1fffff", 0xfffff as f64, Op::Sub, 0x1fffff as f64, -(0x100000 as f64)),
        s("-0x100000 + 0x1fffff", -(0x100000 as f64), Op::Add, 0x1fffff as f64, 0xfffff as f64),
        s("0x7fffffff * -1", 0.0, Op::AddMult(-1), 0x7fffffff as f64, -(0x7fffffff as f64)),
    ]
}

fn reference_values() -> [f64; 7] {
    [
        0x7fff0000 as f64,
        0xffff as f64,
        0x7f000000 as f64,
        0xff0000 as f64,
        0xff as f64,
        0xff00 as f64,
        -(0x7777 as f64) / 256.0,
    ]
}

fn check_serialization<T: FixedPoint + Codec>(args: &Args) -> Result<usize> {
    let values = reference_values()
        .iter()
        .map(|&d| T::from_f64(d))
        .collect::<Result<Vec<T>, _>>()
        .context("convert reference values")?;

    write_values(&args.path, &values).with_context(|| format!("write {}", args.path.display()))?;
    let back: Vec<T> =
        read_values(&args.path).with_context(|| format!("read {}", args.path.display()))?;

    let mut failures = 0;
    for (i, (want, got)) in values.iter().zip(back.iter()).enumerate() {
        if want == got {
            println!("PASS cmp {}/{}", i, values.len());
        } else {
            println!("FAIL cmp {}/{}: wrote {:?}, read {:?}", i, values.len(), want, got);
            failures += 1;
        }
    }
    if back.len() != values.len() {
        println!("FAIL read {} values, wrote {}", back.len(), values.len());
        failures += 1;
    }
    Ok(failures)
}

fn run_scenario<T: FixedPoint>(sc: &Scenario) -> Result<bool> {
    let mut x = T::from_f64(sc.x)?;
    let y = T::from_f64(sc.y)?;
    let expected = T::from_f64(sc.expected)?;
    match sc.op {
        Op::Add => x.add(y)?,
        Op::Sub => x.sub(y)?,
        Op::AddMult(m) => x.add_mult(y, m)?,
    }
    tracing::debug!(scenario = sc.name, result = ?x, expected = ?expected);
    Ok(x.cmp(&expected).is_eq())
}

fn run<T: FixedPoint + Codec>(args: &Args) -> Result<usize> {
    let mut failures = check_serialization::<T>(args)?;
    for sc in scenarios() {
        match run_scenario::<T>(&sc) {
            Ok(true) => println!("PASS {}", sc.name),
            Ok(false) => {
                println!("FAIL {}", sc.name);
                failures += 1;
            }
            Err(e) => {
                println!("FAIL {}: {:#}", sc.name, e);
                failures += 1;
            }
        }
    }
    Ok(failures)
}

/// Deletes the scratch file. A file that was never created is not an error;
/// any other failure is reported and the run carries on.
fn remove_scratch(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not remove scratch file");
            false
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .without_time()
        .init();

    let args = Args::parse();
    tracing::info!(backend = ?args.backend, path = %args.path.display(), "running self test");

    let failures = match args.backend {
        Backend::Wide => run::<BigGuy>(&args),
        Backend::Compact => run::<CompactGuy>(&args),
    };

    if !args.keep {
        remove_scratch(&args.path);
    }

    let failures = failures?;
    if failures > 0 {
        anyhow::bail!("{} check(s) failed", failures);
    }
    println!("✓ all checks passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bigguy.bin");
        std::fs::write(&path, [0u8; 16]).unwrap();

        assert!(remove_scratch(&path));
        assert!(!path.exists());
        // already gone
        assert!(remove_scratch(&path));
        // a directory cannot be removed as a file
        assert!(!remove_scratch(dir.path()));
        assert!(dir.path().exists());
    }

    #[test]
    fn test_scenarios_pass_on_both_backends() {
        for sc in scenarios() {
            assert!(run_scenario::<BigGuy>(&sc).unwrap(), "wide: {}", sc.name);
            assert!(run_scenario::<CompactGuy>(&sc).unwrap(), "compact: {}", sc.name);
        }
    }
}
