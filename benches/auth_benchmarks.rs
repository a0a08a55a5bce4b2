use criterion::{criterion_group, criterion_main, Criterion};
use schoolhub::auth::{decode_token, TokenIssuer, MIN_BCRYPT_COST};
use std::hint::black_box;

fn bench_token_issue(c: &mut Criterion) {
    let issuer = TokenIssuer::new(b"bench-secret", 86_400);

    c.bench_function("token_issue", |b| {
        b.iter(|| issuer.issue_for(black_box(1), black_box("bench@school.test")))
    });
}

fn bench_token_verify(c: &mut Criterion) {
    let issuer = TokenIssuer::new(b"bench-secret", 86_400);
    let token = issuer.issue_for(1, "bench@school.test").unwrap();

    c.bench_function("token_verify", |b| b.iter(|| issuer.verify(black_box(&token))));

    c.bench_function("token_decode_client", |b| {
        b.iter(|| decode_token(black_box(&token), black_box(0)))
    });
}

fn bench_password_verify(c: &mut Criterion) {
    let hash = bcrypt::hash("bench-password", MIN_BCRYPT_COST).unwrap();

    c.bench_function("bcrypt_verify_min_cost", |b| {
        b.iter(|| bcrypt::verify(black_box("bench-password"), black_box(&hash)))
    });
}

criterion_group!(
    benches,
    bench_token_issue,
    bench_token_verify,
    bench_password_verify
);
criterion_main!(benches);
