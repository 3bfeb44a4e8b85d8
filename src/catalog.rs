// Static line catalog and schedule figures.

/// A named, coded public-transit route. The catalog is fixed at compile time
/// and never mutated at runtime.
pub struct BusLine {
    pub code: &'static str,
    pub name: &'static str,
}

/// Schedule figures for one line, GTFS-derived.
pub struct LineMetrics {
    pub trip_minutes: u32,
    pub headway_minutes: u32,
    pub distance_km: f32,
    pub fleet: u32,
}

impl LineMetrics {
    /// Planned departures per hour, from the headway.
    pub fn vehicles_per_hour(&self) -> u32 {
        (60.0 / self.headway_minutes as f32).round() as u32
    }
}

/// Fallback figures for a code missing from the table. Not an error — the
/// modal still renders something plausible.
pub static DEFAULT_METRICS: LineMetrics = LineMetrics {
    trip_minutes: 45,
    headway_minutes: 10,
    distance_km: 12.0,
    fleet: 8,
};

pub static CATALOG: [BusLine; 33] = [
    BusLine { code: "524M-10", name: "Mascarenhas de Morais – Shopping Aricanduva" },
    BusLine { code: "3112-10", name: "Vila Industrial – Metrô Belém" },
    BusLine { code: "414P-10", name: "Vila Industrial – Metrô Carrão" },
    BusLine { code: "514T-10", name: "Term. Sacomã – Conj. Hab. Teotônio Vilela" },
    BusLine { code: "4033-10", name: "Jardim Guairacá – Nova Conquista" },
    BusLine { code: "4734-10", name: "Vila Moraes – Metrô Saúde" },
    BusLine { code: "5020-10", name: "Hospital Heliópolis – Term. Sacomã" },
    BusLine { code: "373T-10", name: "Jardim Itápolis – Metrô Bresser" },
    BusLine { code: "5032-10", name: "Vila Arapuá – Term. Sacomã" },
    BusLine { code: "4025-10", name: "Vila Califórnia – Metrô Tatuapé" },
    BusLine { code: "4726-10", name: "Mooca – Metrô Tatuapé" },
    BusLine { code: "5031-10", name: "Vila Arapuá – Term. Sacomã" },
    BusLine { code: "573H-10", name: "Hospital Heliópolis – Metrô Bresser" },
    BusLine { code: "4031-10", name: "Pq. Santa Madalena – Metrô Tamanduateí" },
    BusLine { code: "524L-10", name: "Parque São Lucas – Metrô Tatuapé" },
    BusLine { code: "364A-10", name: "Hospital Ipiranga – Shopping Aricanduva" },
    BusLine { code: "573T-10", name: "Term. Vila Carrão – Metrô Carrão" },
    BusLine { code: "4028-10", name: "Hospital São Mateus – Divisa de Mauá" },
    BusLine { code: "4716-10", name: "Vila Moraes – Metrô Santa Cruz" },
    BusLine { code: "4030-10", name: "Fazenda da Juta – Shopping Aricanduva" },
    BusLine { code: "3099-10", name: "Hospital São Mateus – Jardim da Conquista" },
    BusLine { code: "4027-10", name: "Jardim Santo André – Fazenda da Juta" },
    BusLine { code: "3098-10", name: "Jardim Marilu – Terminal São Mateus" },
    BusLine { code: "4029-10", name: "São Mateus – Vila Prudente" },
    BusLine { code: "5035-10", name: "Vila Moinho Velho – Term. Sacomã" },
    BusLine { code: "3098-31", name: "Jardim Marilu – Terminal São Mateus (Noturno)" },
    BusLine { code: "4027-41", name: "Jardim Santo André – Metrô Itaquera" },
    BusLine { code: "4729-10", name: "Parque Bancário – Metrô Belém" },
    BusLine { code: "574W-10", name: "Jardim Walkiria – Metrô Belém" },
    BusLine { code: "5031-21", name: "Vila Arapuá – Term. Sacomã (Pico)" },
    BusLine { code: "4032-10", name: "Vila das Mercês – Objetivo UNIP" },
    BusLine { code: "4735-10", name: "Jardim Vera Cruz – Metrô Artur Alvim" },
    BusLine { code: "5025-10", name: "Jardim Guairacá – Metrô Tamanduateí" },
];

#[rustfmt::skip]
static METRICS: [(&str, LineMetrics); 33] = [
    ("524M-10", LineMetrics { trip_minutes: 73,  headway_minutes: 7,  distance_km: 12.5, fleet: 10 }),
    ("3112-10", LineMetrics { trip_minutes: 105, headway_minutes: 12, distance_km: 12.5, fleet: 9 }),
    ("414P-10", LineMetrics { trip_minutes: 114, headway_minutes: 14, distance_km: 12.5, fleet: 8 }),
    ("514T-10", LineMetrics { trip_minutes: 122, headway_minutes: 12, distance_km: 12.5, fleet: 16 }),
    ("4033-10", LineMetrics { trip_minutes: 118, headway_minutes: 13, distance_km: 12.5, fleet: 15 }),
    ("4734-10", LineMetrics { trip_minutes: 57,  headway_minutes: 4,  distance_km: 12.5, fleet: 14 }),
    ("5020-10", LineMetrics { trip_minutes: 29,  headway_minutes: 6,  distance_km: 12.5, fleet: 5 }),
    ("373T-10", LineMetrics { trip_minutes: 109, headway_minutes: 10, distance_km: 12.5, fleet: 16 }),
    ("5032-10", LineMetrics { trip_minutes: 80,  headway_minutes: 6,  distance_km: 12.5, fleet: 12 }),
    ("4025-10", LineMetrics { trip_minutes: 100, headway_minutes: 7,  distance_km: 12.5, fleet: 14 }),
    ("4726-10", LineMetrics { trip_minutes: 55,  headway_minutes: 4,  distance_km: 12.5, fleet: 14 }),
    ("5031-10", LineMetrics { trip_minutes: 52,  headway_minutes: 5,  distance_km: 12.5, fleet: 15 }),
    ("573H-10", LineMetrics { trip_minutes: 119, headway_minutes: 8,  distance_km: 12.5, fleet: 16 }),
    ("4031-10", LineMetrics { trip_minutes: 90,  headway_minutes: 10, distance_km: 12.5, fleet: 9 }),
    ("524L-10", LineMetrics { trip_minutes: 88,  headway_minutes: 20, distance_km: 12.5, fleet: 4 }),
    ("364A-10", LineMetrics { trip_minutes: 144, headway_minutes: 11, distance_km: 12.5, fleet: 13 }),
    ("573T-10", LineMetrics { trip_minutes: 90,  headway_minutes: 8,  distance_km: 12.5, fleet: 12 }),
    ("4028-10", LineMetrics { trip_minutes: 76,  headway_minutes: 9,  distance_km: 12.5, fleet: 8 }),
    ("4716-10", LineMetrics { trip_minutes: 73,  headway_minutes: 11, distance_km: 12.5, fleet: 7 }),
    ("4030-10", LineMetrics { trip_minutes: 90,  headway_minutes: 12, distance_km: 12.5, fleet: 8 }),
    ("3099-10", LineMetrics { trip_minutes: 74,  headway_minutes: 6,  distance_km: 12.5, fleet: 13 }),
    ("4027-10", LineMetrics { trip_minutes: 70,  headway_minutes: 6,  distance_km: 12.5, fleet: 13 }),
    ("3098-10", LineMetrics { trip_minutes: 73,  headway_minutes: 8,  distance_km: 12.5, fleet: 9 }),
    ("4029-10", LineMetrics { trip_minutes: 92,  headway_minutes: 11, distance_km: 12.5, fleet: 8 }),
    ("5035-10", LineMetrics { trip_minutes: 51,  headway_minutes: 8,  distance_km: 12.5, fleet: 6 }),
    ("3098-31", LineMetrics { trip_minutes: 76,  headway_minutes: 12, distance_km: 12.5, fleet: 6 }),
    ("4027-41", LineMetrics { trip_minutes: 48,  headway_minutes: 20, distance_km: 12.5, fleet: 2 }),
    ("4729-10", LineMetrics { trip_minutes: 99,  headway_minutes: 20, distance_km: 12.5, fleet: 5 }),
    ("574W-10", LineMetrics { trip_minutes: 112, headway_minutes: 12, distance_km: 12.5, fleet: 9 }),
    ("5031-21", LineMetrics { trip_minutes: 33,  headway_minutes: 6,  distance_km: 12.5, fleet: 6 }),
    ("4032-10", LineMetrics { trip_minutes: 86,  headway_minutes: 20, distance_km: 12.5, fleet: 4 }),
    ("4735-10", LineMetrics { trip_minutes: 66,  headway_minutes: 20, distance_km: 12.5, fleet: 3 }),
    ("5025-10", LineMetrics { trip_minutes: 64,  headway_minutes: 14, distance_km: 12.5, fleet: 5 }),
];

/// Case-insensitive substring filter over code and display name, preserving
/// catalog order. An empty term matches everything.
pub fn filter_lines(term: &str) -> Vec<&'static BusLine> {
    let needle = term.to_lowercase();
    CATALOG
        .iter()
        .filter(|line| {
            line.code.to_lowercase().contains(&needle)
                || line.name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Schedule figures for a line code, falling back to [`DEFAULT_METRICS`]
/// for codes outside the table.
pub fn lookup_metrics(code: &str) -> &'static LineMetrics {
    METRICS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, m)| m)
        .unwrap_or(&DEFAULT_METRICS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_term_returns_full_catalog_in_order() {
        let all = filter_lines("");
        assert_eq!(all.len(), CATALOG.len());
        for (got, expected) in all.iter().zip(CATALOG.iter()) {
            assert_eq!(got.code, expected.code);
        }
    }

    #[test]
    fn filter_matches_code_and_name_case_insensitively() {
        let by_code = filter_lines("524m");
        let codes: Vec<_> = by_code.iter().map(|l| l.code).collect();
        assert_eq!(codes, vec!["524M-10"]);

        let by_name = filter_lines("mooca");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].code, "4726-10");
    }

    #[test]
    fn filter_tatuape_matches_exactly_the_tatuape_lines() {
        let hits = filter_lines("Tatuapé");
        let codes: Vec<_> = hits.iter().map(|l| l.code).collect();
        assert_eq!(codes, vec!["4025-10", "4726-10", "524L-10"]);
    }

    #[test]
    fn filter_preserves_catalog_order() {
        let hits = filter_lines("Term. Sacomã");
        let codes: Vec<_> = hits.iter().map(|l| l.code).collect();
        assert_eq!(
            codes,
            vec!["514T-10", "5020-10", "5032-10", "5031-10", "5035-10", "5031-21"]
        );
    }

    #[test]
    fn filter_no_match_is_empty_not_an_error() {
        assert!(filter_lines("zeppelin").is_empty());
    }

    #[test]
    fn lookup_is_pure_and_idempotent() {
        let a = lookup_metrics("524M-10");
        let b = lookup_metrics("524M-10");
        assert_eq!(a.trip_minutes, b.trip_minutes);
        assert_eq!(a.headway_minutes, 7);
        assert_eq!(a.fleet, 10);
    }

    #[test]
    fn lookup_missing_code_falls_back_to_default() {
        let m = lookup_metrics("0000-00");
        assert_eq!(m.trip_minutes, 45);
        assert_eq!(m.headway_minutes, 10);
        assert!((m.distance_km - 12.0).abs() < f32::EPSILON);
        assert_eq!(m.fleet, 8);
    }

    #[test]
    fn vehicles_per_hour_rounds_sixty_over_headway() {
        // 524M-10 has a 7 minute headway: round(60/7) = 9.
        assert_eq!(lookup_metrics("524M-10").vehicles_per_hour(), 9);
        // 4734-10 has a 4 minute headway: exactly 15.
        assert_eq!(lookup_metrics("4734-10").vehicles_per_hour(), 15);
        // Default tuple: round(60/10) = 6.
        assert_eq!(DEFAULT_METRICS.vehicles_per_hour(), 6);
    }

    #[test]
    fn every_catalog_line_has_table_metrics() {
        for line in &CATALOG {
            assert!(METRICS.iter().any(|(c, _)| *c == line.code), "{}", line.code);
        }
    }
}
