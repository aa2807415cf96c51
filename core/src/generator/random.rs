use super::*;

/// Uniform placement by rejection sampling, optionally keeping one cell mine-free.
///
/// Only the excluded cell itself is protected; its neighbors may still get mines.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
    safe_cell: Option<Coord2>,
}

impl RandomMineGenerator {
    pub fn new(seed: u64, safe_cell: Option<Coord2>) -> Self {
        Self { seed, safe_cell }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: BoardConfig) -> MineLayout {
        use rand::prelude::*;

        let (rows, columns) = config.size();
        let total_cells = config.total_cells();
        let stride = CellCount::from(columns);
        let excluded = self
            .safe_cell
            .filter(|&(row, column)| row < rows && column < columns)
            .map(|(row, column)| CellCount::from(row) * stride + CellCount::from(column));

        let free_cells = total_cells - CellCount::from(excluded.is_some());
        let mines = if config.mines() > free_cells {
            log::warn!(
                "Requested {} mines but only {} cells are free, placing {}",
                config.mines(),
                free_cells,
                free_cells
            );
            free_cells
        } else {
            config.mines()
        };

        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());
        let mut mines_placed = 0;
        let mut draws = 0u32;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while mines_placed < mines {
            let index: CellCount = rng.random_range(0..total_cells);
            draws += 1;
            if Some(index) == excluded {
                continue;
            }

            let coords = ((index / stride) as Coord, (index % stride) as Coord);
            let cell = &mut mine_mask[coords.to_nd_index()];
            if !*cell {
                *cell = true;
                mines_placed += 1;
            }
        }
        log::debug!(
            "Placed {} mines on {}x{} after {} draws (seed {}, safe cell {:?})",
            mines_placed,
            columns,
            rows,
            draws,
            self.seed,
            self.safe_cell
        );

        MineLayout::from_mine_mask(mine_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exact_count_and_skips_safe_cell() {
        let config = BoardConfig::new(4, 3, 11).unwrap();

        for seed in 0..32 {
            let layout = RandomMineGenerator::new(seed, Some((1, 2))).generate(config);

            assert_eq!(layout.mine_count(), 11);
            assert!(!layout.contains_mine((1, 2)));
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let config = GameLevel::Medium.config();

        let a = RandomMineGenerator::new(7, None).generate(config);
        let b = RandomMineGenerator::new(7, None).generate(config);

        assert_eq!(a, b);
    }

    #[test]
    fn overfull_request_is_capped() {
        let config = BoardConfig::new_unchecked(2, 2, 4);

        let layout = RandomMineGenerator::new(3, Some((0, 0))).generate(config);

        assert_eq!(layout.mine_count(), 3);
        assert!(!layout.contains_mine((0, 0)));
    }
}
