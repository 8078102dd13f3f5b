pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }

    let mut result = Vec::with_capacity(n);
    let step = (end - start) / (n as f64 - 1.0);

    for i in 0..n {
        result.push(start + (i as f64) * step);
    }

    result
}

/// Frequency grid marching from `start` to `end` inclusive with `step`,
/// with half-step tolerance against accumulated float drift.
pub fn frequency_grid(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut grid = Vec::new();

    let mut i = 0;
    loop {
        let w = start + (i as f64) * step;
        if w > end + 0.5 * step {
            break;
        }

        grid.push(w);
        i += 1;
    }

    grid
}

#[cfg(test)]
mod test {
    use super::{frequency_grid, linspace};

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(1., 5., 1), vec![1.]);
        assert_eq!(linspace(0., 1., 3), vec![0., 0.5, 1.]);

        let sweep = linspace(0., 180., 19);
        assert_eq!(sweep.len(), 19);
        assert_eq!(sweep[1], 10.);
        assert_eq!(*sweep.last().unwrap(), 180.);
    }

    #[test]
    fn test_frequency_grid_inclusive() {
        let grid = frequency_grid(1600., 1700., 1.);

        assert_eq!(grid.len(), 101);
        assert_eq!(grid[0], 1600.);
        assert_eq!(*grid.last().unwrap(), 1700.);
    }

    #[test]
    fn test_frequency_grid_fractional_step() {
        let grid = frequency_grid(0., 1., 0.1);

        assert_eq!(grid.len(), 11);
        assert!((grid[10] - 1.).abs() < 1e-12);
    }
}
