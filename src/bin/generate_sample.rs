use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value as JsonValue, json};

const WELLS: [&str; 8] = ["X-27", "I_A", "D", "B", "B_AT2", "B_A", "AA", "A"];

/// Shallow to deep.
const GROUPS: [&str; 8] = ["HH", "GG", "FF", "EE", "DD", "CC", "BB", "AA"];

const DEPTH_STEP: f64 = 0.5;

#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write a synthetic well-log data folder", long_about = None)]
struct Args {
    /// Folder to write `well_log_data.txt` and the group files into
    #[arg(default_value = "sample_data")]
    out_dir: PathBuf,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Group interval `(top, base)` in one well.
struct Interval {
    group: &'static str,
    top: f64,
    base: f64,
    gamma: f64,
    res: f64,
}

fn layout_intervals(rng: &mut SimpleRng) -> Vec<Interval> {
    let mut depth = rng.range(900.0, 1300.0);
    GROUPS
        .iter()
        .map(|&group| {
            let thickness = rng.range(120.0, 320.0);
            let interval = Interval {
                group,
                top: depth,
                base: depth + thickness,
                gamma: rng.range(30.0, 120.0),
                res: rng.range(0.5, 3.0),
            };
            depth += thickness;
            interval
        })
        .collect()
}

/// One column-oriented record group, keyed by row index like `DataFrame.to_json()`.
fn well_record_group(well: &str, intervals: &[Interval], rng: &mut SimpleRng) -> JsonValue {
    let mut wells = Map::new();
    let mut depths = Map::new();
    let mut gamma = Map::new();
    let mut res = Map::new();

    let (Some(first), Some(last)) = (intervals.first(), intervals.last()) else {
        return json!({});
    };
    let mut depth = first.top - 50.0;
    let mut row = 0usize;
    while depth < last.base + 50.0 {
        let interval = intervals
            .iter()
            .find(|iv| iv.top <= depth && depth < iv.base)
            .unwrap_or(first);

        let key = row.to_string();
        wells.insert(key.clone(), json!(well));
        depths.insert(key.clone(), json!(depth));
        gamma.insert(key.clone(), json!(rng.gauss(interval.gamma, 8.0).max(0.0)));
        // Occasional tool dropouts on the resistivity log.
        let res_value = if rng.next_f64() < 0.002 {
            JsonValue::Null
        } else {
            json!(10f64.powf(rng.gauss(interval.res.log10(), 0.08)))
        };
        res.insert(key, res_value);

        depth += DEPTH_STEP;
        row += 1;
    }

    json!({ "Well": wells, "Depth": depths, "Gamma": gamma, "Res": res })
}

fn write_group_file(path: &Path, intervals: &[Interval]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["name", "Surface", "Obs#", "MD", "TVD"])?;
    for iv in intervals {
        for (obs, md) in [("Top", iv.top), ("Base", iv.base)] {
            let md_text = format!("{md:.2}");
            let tvd_text = format!("{:.2}", md * 0.98);
            writer.write_record([iv.group, "group", obs, md_text.as_str(), tvd_text.as_str()])?;
        }
        let horizon_md = format!("{:.2}", iv.top + 5.0);
        writer.write_record([iv.group, "horizon", "Top", horizon_md.as_str(), ""])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let Args { out_dir } = Args::parse();
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let mut groups = Vec::with_capacity(WELLS.len());

    for well in WELLS {
        let intervals = layout_intervals(&mut rng);
        groups.push(well_record_group(well, &intervals, &mut rng));

        let group_path = out_dir.join(format!("EAGE_Hackathon_2018_Well_{well}.csv"));
        write_group_file(&group_path, &intervals)?;
    }

    let data_path = out_dir.join("well_log_data.txt");
    let file = std::fs::File::create(&data_path)
        .with_context(|| format!("creating {}", data_path.display()))?;
    serde_json::to_writer(std::io::BufWriter::new(file), &groups)
        .context("writing well log JSON")?;

    println!(
        "Wrote {} wells to {} (run with --data-dir {})",
        WELLS.len(),
        data_path.display(),
        out_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_dir_defaults_to_sample_data() {
        let args = Args::try_parse_from(["generate_sample"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("sample_data"));

        let args = Args::try_parse_from(["generate_sample", "/tmp/logs"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("/tmp/logs"));
    }
}
