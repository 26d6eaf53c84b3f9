//! Random laptops and scores for demos and tests.

use crate::laptop::*;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

pub fn new_laptop() -> Laptop {
    let mut rng = rand::thread_rng();
    let brand = pick(&mut rng, &["Apple", "Dell", "Lenovo"]);
    let name = match brand {
        "Apple" => pick(&mut rng, &["Macbook Air", "Macbook Pro"]),
        "Dell" => pick(&mut rng, &["Latitude", "Vostro", "XPS", "Alienware"]),
        _ => pick(&mut rng, &["Thinkpad X1", "Thinkpad P1", "Thinkpad P53"]),
    };

    Laptop {
        id: Uuid::new_v4().to_string(),
        brand: brand.to_string(),
        name: name.to_string(),
        cpu: new_cpu(&mut rng),
        ram: Memory::gigabytes(rng.gen_range(4..=64)),
        gpus: vec![new_gpu(&mut rng)],
        storages: vec![
            Storage {
                driver: StorageDriver::Ssd,
                memory: Memory::gigabytes(rng.gen_range(128..=1024)),
            },
            Storage {
                driver: StorageDriver::Hdd,
                memory: Memory::new(rng.gen_range(1..=6), MemoryUnit::Terabyte),
            },
        ],
        screen: new_screen(&mut rng),
        keyboard: Keyboard {
            layout: *[KeyboardLayout::Qwerty, KeyboardLayout::Qwertz, KeyboardLayout::Azerty]
                .choose(&mut rng)
                .unwrap_or(&KeyboardLayout::Qwerty),
            backlit: rng.gen_bool(0.5),
        },
        weight: Weight::Kg(rng.gen_range(1.0..3.0)),
        price_usd: rng.gen_range(1500.0..3500.0),
        release_year: rng.gen_range(2015..=2024),
        updated_at: Some(Utc::now()),
    }
}

/// Integer score in `1..=10`, as f64.
pub fn new_score() -> f64 {
    f64::from(rand::thread_rng().gen_range(1u8..=10))
}

fn new_cpu(rng: &mut impl Rng) -> Cpu {
    let brand = pick(rng, &["Intel", "AMD"]);
    let name = if brand == "Intel" {
        pick(rng, &["Xeon E-2286M", "Core i9-9980HK", "Core i7-9750H", "Core i5-9400F"])
    } else {
        pick(rng, &["Ryzen 7 PRO 2700U", "Ryzen 5 PRO 3500U", "Ryzen 3 PRO 3200GE"])
    };
    let number_cores = rng.gen_range(2..=8);
    let number_threads = rng.gen_range(number_cores..=12);
    let min_ghz = rng.gen_range(2.0..3.5);
    let max_ghz = rng.gen_range(min_ghz..5.0);

    Cpu {
        brand: brand.to_string(),
        name: name.to_string(),
        number_cores,
        number_threads,
        min_ghz,
        max_ghz,
    }
}

fn new_gpu(rng: &mut impl Rng) -> Gpu {
    let brand = pick(rng, &["Nvidia", "AMD"]);
    let name = if brand == "Nvidia" {
        pick(rng, &["RTX 2060", "RTX 2070", "GTX 1660-Ti", "GTX 1070"])
    } else {
        pick(rng, &["RX 590", "RX 580", "RX 5700-XT", "RX Vega-56"])
    };
    let min_ghz = rng.gen_range(1.0..1.5);
    let max_ghz = rng.gen_range(min_ghz..2.0);

    Gpu {
        brand: brand.to_string(),
        name: name.to_string(),
        min_ghz,
        max_ghz,
        memory: Memory::gigabytes(rng.gen_range(2..=6)),
    }
}

fn new_screen(rng: &mut impl Rng) -> Screen {
    let height = rng.gen_range(1080..=4320);
    let width = height * 16 / 9;

    Screen {
        size_inch: rng.gen_range(13.0..17.0),
        resolution: Resolution { width, height },
        panel: if rng.gen_bool(0.5) { Panel::Ips } else { Panel::Oled },
        multitouch: rng.gen_bool(0.5),
    }
}

fn pick<'a>(rng: &mut impl Rng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}
