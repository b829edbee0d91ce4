use super::*;

fn gradient(w: u32, h: u32) -> RasterImage {
    RasterImage::from_fn(w, h, |x, y| [(x * 7) as u8, (y * 11) as u8, (x ^ y) as u8, 255])
}

fn assert_disjoint_cover(image: &RasterImage, parts: &[SubImage]) {
    let src = image.data();
    for (px_idx, px) in src.chunks_exact(4).enumerate() {
        let offset = px_idx * 4;
        let holders: Vec<&SubImage> = parts
            .iter()
            .filter(|p| p.data()[offset + 3] != 0)
            .collect();
        assert_eq!(holders.len(), 1, "pixel {px_idx} held by {}", holders.len());
        assert_eq!(&holders[0].data()[offset..offset + 4], px);
    }
}

#[test]
fn zero_count_is_invalid_configuration() {
    assert!(matches!(
        PixelPartitioner::new(0),
        Err(VanishError::InvalidConfiguration(_))
    ));
    let mut rng = Rng64::new(1);
    assert!(partition(&gradient(2, 2), 0, &mut rng).is_err());
}

#[test]
fn default_count_is_thirty_five() {
    assert_eq!(PixelPartitioner::default().count(), 35);
}

#[test]
fn every_pixel_lands_in_exactly_one_layer() {
    let image = gradient(23, 17);
    for count in [1usize, 2, 5, 35] {
        let mut rng = Rng64::new(count as u64);
        let parts = partition(&image, count, &mut rng).unwrap();
        assert_eq!(parts.len(), count);
        assert_disjoint_cover(&image, &parts);
        let owned: usize = parts.iter().map(SubImage::owned_pixels).sum();
        assert_eq!(owned, image.pixel_count());
    }
}

#[test]
fn layers_share_source_dimensions() {
    let image = gradient(9, 4);
    let mut rng = Rng64::new(5);
    let parts = partition(&image, 35, &mut rng).unwrap();
    for p in &parts {
        assert_eq!((p.width(), p.height()), (9, 4));
        assert_eq!(p.data().len(), image.data().len());
    }
}

#[test]
fn single_layer_is_a_copy() {
    let image = gradient(8, 8);
    let mut rng = Rng64::new(0);
    let parts = partition(&image, 1, &mut rng).unwrap();
    assert_eq!(parts[0].data(), image.data());
}

#[test]
fn last_bucket_is_reachable() {
    let image = gradient(40, 40);
    let mut rng = Rng64::new(77);
    let parts = partition(&image, 4, &mut rng).unwrap();
    assert!(parts.iter().all(|p| p.owned_pixels() > 0));
}

#[test]
fn same_seed_gives_same_partition() {
    let image = gradient(12, 12);
    let a = partition(&image, 6, &mut Rng64::new(99)).unwrap();
    let b = partition(&image, 6, &mut Rng64::new(99)).unwrap();
    assert_eq!(a, b);
}
