//! Console demo: simulate EMG, compress, decompress, and verify the round trip
//!
//! Run with: cargo run --example emg_demo
//! Set RUST_LOG=emgcodec=debug to see per-frame codec events.
//! Pass a number as the first argument for a reproducible seeded run.

use emgcodec::signal::{EmgSimulator, SimulationConfig};
use emgcodec::{compress, decompress, CompressionStats, FrequencyTable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

const NUM_SAMPLES: usize = 1000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rng = match std::env::args().nth(1).and_then(|s| s.parse::<u64>().ok()) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!("=== emgcodec Round-Trip Demo ===\n");

    let config = SimulationConfig::default();
    let mut simulator = EmgSimulator::new(config, rng);
    let samples = simulator.generate_adc(NUM_SAMPLES);

    println!("Signal:");
    println!("  Sample rate: {} Hz", config.sample_rate_hz);
    println!(
        "  Contraction: {:.1}s every {:.1}s",
        config.contraction_duration_s, config.contraction_period_s
    );

    let compressed = compress(&samples).expect("Compression failed");
    let restored = decompress(&compressed).expect("Decompression failed");
    let stats = CompressionStats::measure(&samples, &compressed, &restored);

    if let Some(frame) = emgcodec::delta::encode(&samples) {
        let table = FrequencyTable::count(&frame.deltas);
        println!("  Distinct deltas: {}", table.used());
        println!("  Delta entropy: {:.2} bits/sample", table.entropy());
    }
    println!();

    println!("Samples: {}", stats.sample_count);
    println!("Compressed bytes: {}", stats.compressed_bytes);
    println!("Restored samples: {}", stats.restored_count);
    println!("Mismatches: {}", stats.mismatches);
    println!("Compression ratio (compressed/raw): {:.3}", stats.ratio());

    if stats.is_lossless() {
        println!("\n✓ Lossless roundtrip successful!");
    } else {
        println!("\n✗ Restored signal differs from the original");
        std::process::exit(1);
    }
}
