use super::*;

#[test]
fn same_seed_same_stream() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn unit_interval_is_half_open() {
    let mut rng = Rng64::new(7);
    for _ in 0..10_000 {
        let u = rng.next_f64_01();
        assert!((0.0..1.0).contains(&u));
    }
}

#[test]
fn index_covers_every_bucket_and_stays_in_range() {
    let mut rng = Rng64::new(3);
    let mut seen = [0u32; 5];
    for _ in 0..5_000 {
        let i = rng.index(5);
        assert!(i < 5);
        seen[i] += 1;
    }
    assert!(seen.iter().all(|&c| c > 0));
}

#[test]
fn index_of_one_is_always_zero() {
    let mut rng = Rng64::new(11);
    for _ in 0..100 {
        assert_eq!(rng.index(1), 0);
    }
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}
