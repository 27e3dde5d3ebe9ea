use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use storefront_catalog::{
    Catalog, FilterCriteria, ListingController, PriceRange, Product, ProductRecord, SortKey, filter,
    sort,
};
use storefront_core::Money;

const CATEGORIES: [&str; 6] = ["Smartphones", "Laptops", "Audio", "Gaming", "Footwear", "Accessories"];
const BRANDS: [&str; 6] = ["Apple", "Samsung", "Nike", "Adidas", "Sony", "Dell"];

/// Synthetic catalog with a spread of categories, brands, prices and ratings.
fn generated_catalog(size: usize) -> Catalog {
    let products = (0..size)
        .map(|i| {
            Product::try_from(ProductRecord {
                id: i.to_string(),
                slug: format!("product-{i}"),
                name: format!("{} Model {i}", BRANDS[i % BRANDS.len()]),
                category: CATEGORIES[(i / 3) % CATEGORIES.len()].to_string(),
                price_cents: ((i * 7919) % 150_000) as u64,
                rating: (i % 11) as f64 / 2.0,
                is_new: i % 4 == 0,
                ..ProductRecord::default()
            })
            .unwrap()
        })
        .collect();
    Catalog::new(products).unwrap()
}

fn busy_criteria() -> FilterCriteria {
    FilterCriteria {
        categories: vec!["audio".into(), "footwear".into()],
        brands: vec!["sony".into(), "nike".into()],
        price_range: PriceRange::new(Money::from_units(50), Money::from_units(900)),
        rating: Some(2.0),
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("listing_pipeline");

    for size in [100usize, 1_000, 10_000] {
        let catalog = generated_catalog(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("filter", size), &catalog, |b, catalog| {
            let criteria = busy_criteria();
            b.iter(|| filter(black_box(catalog), &criteria));
        });

        for key in [SortKey::PriceLowHigh, SortKey::NameAZ] {
            group.bench_with_input(
                BenchmarkId::new(format!("sort/{key}"), size),
                &catalog,
                |b, catalog| {
                    b.iter(|| sort(catalog.iter().collect(), black_box(key)));
                },
            );
        }
    }

    group.finish();
}

fn bench_controller(c: &mut Criterion) {
    let mut group = c.benchmark_group("listing_controller");
    let catalog = generated_catalog(1_000);

    // Criteria edit: full recompute plus page reset.
    group.bench_function("toggle_category", |b| {
        let mut listing = ListingController::new(&catalog);
        b.iter(|| {
            listing.toggle_category(black_box("audio"));
            black_box(listing.view());
        });
    });

    // Page navigation only re-slices the cached sequence.
    group.bench_function("page_navigation", |b| {
        let mut listing = ListingController::new(&catalog);
        listing.set_sort_key(SortKey::Rating);
        let total_pages = listing.total_pages();
        let mut page = 1;
        b.iter(|| {
            page = page % total_pages + 1;
            listing.go_to_page(black_box(page)).unwrap();
            black_box(listing.view());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_controller);
criterion_main!(benches);
