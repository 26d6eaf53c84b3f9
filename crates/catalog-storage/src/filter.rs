use catalog_types::{Filter, Laptop};

/// True when `laptop` satisfies every dimension of `filter`.
pub fn is_qualified(filter: &Filter, laptop: &Laptop) -> bool {
    if laptop.price_usd > filter.max_price_usd {
        return false;
    }
    if laptop.cpu.number_cores < filter.min_cpu_cores {
        return false;
    }
    if laptop.cpu.min_ghz < filter.min_cpu_ghz {
        return false;
    }
    laptop.ram.to_bits() >= filter.min_ram.to_bits()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_types::{Memory, MemoryUnit};

    fn laptop(price: f64, cores: u32, ghz: f64, ram: Memory) -> Laptop {
        let mut laptop = Laptop {
            price_usd: price,
            ram,
            ..Laptop::default()
        };
        laptop.cpu.number_cores = cores;
        laptop.cpu.min_ghz = ghz;
        laptop
    }

    fn filter() -> Filter {
        Filter {
            max_price_usd: 3000.0,
            min_cpu_cores: 4,
            min_cpu_ghz: 2.5,
            min_ram: Memory::gigabytes(8),
        }
    }

    #[test]
    fn each_dimension_rejects_independently() {
        let f = filter();
        assert!(is_qualified(&f, &laptop(3000.0, 4, 2.5, Memory::gigabytes(8))));
        assert!(!is_qualified(&f, &laptop(3000.01, 4, 2.5, Memory::gigabytes(8))));
        assert!(!is_qualified(&f, &laptop(1000.0, 3, 2.5, Memory::gigabytes(8))));
        assert!(!is_qualified(&f, &laptop(1000.0, 4, 2.4, Memory::gigabytes(8))));
        assert!(!is_qualified(&f, &laptop(1000.0, 4, 2.5, Memory::new(4096, MemoryUnit::Megabyte))));
    }

    #[test]
    fn ram_compared_across_units() {
        let f = filter();
        let in_mb = laptop(1000.0, 4, 3.0, Memory::new(8192, MemoryUnit::Megabyte));
        assert!(is_qualified(&f, &in_mb));
    }

    #[test]
    fn raising_max_price_only_admits_more() {
        let pool: Vec<Laptop> = [500.0, 1500.0, 2500.0, 3500.0, 4500.0]
            .into_iter()
            .map(|price| laptop(price, 8, 3.0, Memory::gigabytes(16)))
            .collect();

        let mut previous = 0;
        for max in [0.0, 1000.0, 2000.0, 3000.0, 4000.0, 5000.0] {
            let f = Filter {
                max_price_usd: max,
                ..filter()
            };
            let admitted = pool.iter().filter(|l| is_qualified(&f, l)).count();
            assert!(admitted >= previous);
            previous = admitted;
        }
        assert_eq!(previous, pool.len());
    }
}
