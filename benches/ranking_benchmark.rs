use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recipe_search_engine::{Catalog, RecipeEngine, RecipeRecord, ScoringPolicy};

const DISHES: [&str; 5] = ["Soup", "Stew", "Pie", "Salad", "Curry"];

fn create_test_catalog(count: usize) -> Catalog {
    Catalog::from_records((0..count).map(|i| {
        let dish = DISHES[i % DISHES.len()];
        RecipeRecord::new(i as u64 + 1, format!("Test {} {}", dish, i))
            .with_rating(3.0 + (i % 3) as f64, (i % 50) as u32)
            .with_ingredients([format!("ingredient {}", i % 20), "salt".to_string()])
            .with_category(format!("/{}/", dish))
    }))
}

fn bench_policies(c: &mut Criterion) {
    for size in [1_000, 10_000] {
        let gated = RecipeEngine::new(create_test_catalog(size), ScoringPolicy::QualityGated);
        let fuzzy = RecipeEngine::new(create_test_catalog(size), ScoringPolicy::WeightedFuzzy);

        c.bench_function(&format!("quality_gated_search_{}", size), |b| {
            b.iter(|| black_box(gated.search(black_box("soup"))));
        });

        c.bench_function(&format!("weighted_fuzzy_search_{}", size), |b| {
            b.iter(|| black_box(fuzzy.search(black_box("chicken soup"))));
        });
    }
}

criterion_group!(benches, bench_policies);
criterion_main!(benches);
