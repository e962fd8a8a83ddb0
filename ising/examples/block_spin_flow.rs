use ising::{
    critical_temperature_2d, reduce_levels, DriverConfig, Lattice, Lattice2D, Metropolis,
    SimulationDriver, Spin,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Block-spin view of the 2D Ising model below, at and above T_c
///
/// This example demonstrates:
/// - Equilibrating an 81×81 lattice with the Metropolis driver
/// - Repeated block-spin reductions (81 → 27 → 9 → 3)
/// - How coarse lattices order below T_c and look random above it

fn main() {
    println!("2D Ising Model: Block-Spin Coarse-Graining");
    println!("==========================================\n");

    let lattice_size = 81;
    let sweeps = 300;
    let t_critical = critical_temperature_2d();
    let temperatures = [1.8, t_critical, 3.5];
    let names = ["Low T (ordered)", "Critical T", "High T (disordered)"];

    for (name, &temperature) in names.iter().zip(temperatures.iter()) {
        println!("{} (T = {:.4}):", name, temperature);

        let mut rng = StdRng::seed_from_u64(2024);
        let lattice = Lattice2D::random(lattice_size, &mut rng).expect("valid size");
        let sampler = Metropolis::new(temperature).expect("positive temperature");
        let config = DriverConfig::sweeps(lattice_size, 2, sweeps).expect("budget fits in u64");
        let mut driver =
            SimulationDriver::new(lattice, sampler, rng, config).expect("valid driver config");
        driver.run(|| false, |_| {}).expect("run completes");

        for level in 1..=3 {
            let coarse = reduce_levels(driver.lattice(), level).expect("size is a power of 3");
            println!("  level {} ({}×{}):", level, coarse.size(), coarse.size());
            if coarse.size() <= 9 {
                print_lattice(&coarse);
            }
        }
        println!();
    }
}

fn print_lattice(lattice: &Lattice<2>) {
    for row in lattice.rows() {
        print!("    ");
        for &spin in row {
            print!("{:2}", if spin == Spin::Up { "↑" } else { "↓" });
        }
        println!();
    }
}
