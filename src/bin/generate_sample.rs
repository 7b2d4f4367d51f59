//! Writes a synthetic saved sweep to `calculations/sample_sweep` for trying
//! out the viewer: `sweep-viewer sample_sweep`.

use std::fs;
use std::io::Write;
use std::path::Path;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
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
}

fn write_rows(path: &Path, rows: &[Vec<f64>]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    for row in rows {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.18e}")).collect();
        writeln!(file, "{}", line.join(" "))?;
    }
    Ok(())
}

fn write_column(path: &Path, values: &[f64]) -> std::io::Result<()> {
    let rows: Vec<Vec<f64>> = values.iter().map(|&v| vec![v]).collect();
    write_rows(path, &rows)
}

fn main() -> std::io::Result<()> {
    let mut rng = SimpleRng::new(42);
    let out = Path::new("calculations").join("sample_sweep");
    fs::create_dir_all(&out)?;

    // Center wavelength 400 → 800 nm, separation 2 → 100 nm, width 5 → 40 nm.
    let l0: Vec<f64> = (0..81).map(|i| 400.0 + i as f64 * 5.0).collect();
    let dl: Vec<f64> = (0..50).map(|i| 2.0 + i as f64 * 2.0).collect();
    let w: Vec<f64> = (0..8).map(|i| 5.0 + i as f64 * 5.0).collect();

    write_column(&out.join("l0.txt"), &l0)?;
    write_column(&out.join("dl.txt"), &dl)?;
    write_column(&out.join("w.txt"), &w)?;

    // Broad solar-like reference with a dip.
    let spectrum: Vec<Vec<f64>> = (0..600)
        .map(|i| {
            let wl = 300.0 + i as f64;
            let y = gaussian(wl, 550.0, 150.0, 1.0) - gaussian(wl, 680.0, 15.0, 0.3);
            vec![wl, y.max(0.0)]
        })
        .collect();
    write_rows(&out.join("spectrum.txt"), &spectrum)?;

    // Two optima per slice, drifting apart as w grows.
    for (i, &wi) in w.iter().enumerate() {
        let peaks = [
            (500.0 - wi, 20.0 + wi, 0.8),
            (680.0 + wi, 30.0 + 0.5 * wi, 1.0),
        ];
        let slice: Vec<Vec<f64>> = dl
            .iter()
            .map(|&d| {
                l0.iter()
                    .map(|&l| {
                        let signal: f64 = peaks
                            .iter()
                            .map(|&(pl, pd, amp)| {
                                gaussian(l, pl, 25.0, amp) * gaussian(d, pd, 12.0, 1.0)
                            })
                            .sum();
                        (signal * wi + rng.gauss(0.0, 0.002)).max(0.0)
                    })
                    .collect()
            })
            .collect();
        write_rows(&out.join(format!("Delta_{i}.txt")), &slice)?;
    }

    println!(
        "Wrote {}x{} grid with {} slices to {}",
        dl.len(),
        l0.len(),
        w.len(),
        out.display()
    );
    Ok(())
}
