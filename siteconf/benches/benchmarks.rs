// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use siteconf::{ConfigResolver, Profile, parse_profiles};

const BLOG_PROFILES: &str = r#"
profiles:
  en:
    title: Field Notes
    tagline: I write code
    faviconPath: img/favicon.ico
    host: https://notes.example.org/
    basePath: /blog/
    organizationName: notes
    projectName: blog
    locales: [en]
    presets:
      - name: classic
        options:
          docs:
            enabled: false
          blog:
            routeBasePath: /
            showReadingTime: true
      - name: theme-classic
        options:
          navbar:
            logo:
              alt: Field Notes Logo
              src: img/logo.svg
            items:
              - label: Archive
                to: /archive
                position: right
          footer:
            style: light
            copyright: "Copyright © {year} CC0. Field Notes."
      - name: prism
        options:
          prism:
            theme: github
            darkTheme: dracula
            additionalLanguages: [rust, toml]
"#;

fn benchmark_parse_profiles(c: &mut Criterion,)
{
    c.bench_function("parse_profiles_single", |b| {
        b.iter(|| parse_profiles(black_box(BLOG_PROFILES,),).expect("parse failed",),)
    },);
}

fn benchmark_resolve(c: &mut Criterion,)
{
    let document = parse_profiles(BLOG_PROFILES,).expect("parse failed",);
    let profile = document.profiles["en"].clone();
    let resolver = ConfigResolver::default();

    c.bench_function("resolve_single_profile", |b| {
        b.iter(|| resolver.resolve(black_box(&profile,),).expect("resolve failed",),)
    },);
}

fn benchmark_resolve_all(c: &mut Criterion,)
{
    let document = parse_profiles(BLOG_PROFILES,).expect("parse failed",);
    let template = document.profiles["en"].clone();
    let profiles: BTreeMap<String, Profile,> = (0..64)
        .map(|index| {
            let mut profile = template.clone();
            profile.base_path = format!("/site-{index}/");
            (format!("profile-{index}"), profile,)
        },)
        .collect();
    let resolver = ConfigResolver::default();

    c.bench_function("resolve_all_64_profiles", |b| {
        b.iter(|| {
            let resolved = resolver.resolve_all(black_box(&profiles,),);
            black_box(resolved.len(),)
        },)
    },);
}

criterion_group!(benches, benchmark_parse_profiles, benchmark_resolve, benchmark_resolve_all);
criterion_main!(benches);
