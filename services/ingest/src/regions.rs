//! Fixed reference dimension of regions, seeded once at bootstrap and never
//! modified at runtime. Codes follow the Rosstat regional classification;
//! the 240/670 codes are the "without autonomous districts" breakdowns the
//! publisher reports alongside the parent regions.

pub struct Region {
    pub code: i32,
    pub title: &'static str,
    pub title_eng: &'static str,
}

pub const REGIONS: &[Region] = &[
    Region { code: 1, title: "Российская Федерация", title_eng: "The Russian Federation" },
    Region { code: 2, title: "Центральный федеральный округ", title_eng: "The Central Federal District" },
    Region { code: 3, title: "Белгородская область", title_eng: "Belgorod region" },
    Region { code: 4, title: "Брянская область", title_eng: "Bryansk region" },
    Region { code: 5, title: "Владимирская область", title_eng: "Vladimir region" },
    Region { code: 6, title: "Воронежская область", title_eng: "Voronezh region" },
    Region { code: 7, title: "Ивановская область", title_eng: "Ivanovo region" },
    Region { code: 8, title: "Калужская область", title_eng: "Kaluga region" },
    Region { code: 9, title: "Костромская область", title_eng: "Kostroma region" },
    Region { code: 10, title: "Курская область", title_eng: "Kursk region" },
    Region { code: 11, title: "Липецкая область", title_eng: "Lipetzk region" },
    Region { code: 12, title: "Московская область", title_eng: "Moscow region" },
    Region { code: 13, title: "Орловская область", title_eng: "Oryol region" },
    Region { code: 14, title: "Рязанская область", title_eng: "Ryazan region" },
    Region { code: 15, title: "Смоленская область", title_eng: "Smolensk region" },
    Region { code: 16, title: "Тамбовская область", title_eng: "Tambov region" },
    Region { code: 17, title: "Тверская область", title_eng: "Tver region" },
    Region { code: 18, title: "Тульская область", title_eng: "Tula region" },
    Region { code: 19, title: "Ярославская область", title_eng: "Yaroslavl region" },
    Region { code: 20, title: "г. Москва", title_eng: "The City of Moscow" },
    Region { code: 21, title: "Северо-Западный федеральный округ", title_eng: "The North West Federal District" },
    Region { code: 22, title: "Республика Карелия", title_eng: "Republic of Karelia" },
    Region { code: 23, title: "Республика Коми", title_eng: "Republic of Komi" },
    Region { code: 24, title: "Архангельская область", title_eng: "Arkhangelsk region" },
    Region { code: 25, title: "в том числе Ненецкий автономный округ", title_eng: "Nenets autonomous district" },
    Region {
        code: 240,
        title: "Архангельская область без данных по Ненецкому автономному округу",
        title_eng: "Arkhangelsk region w/o Nenets autonomous district",
    },
    Region { code: 26, title: "Вологодская область", title_eng: "Vologda region" },
    Region { code: 27, title: "Калининградская область", title_eng: "Kaliningrad region" },
    Region { code: 28, title: "Ленинградская область", title_eng: "Leningrad region" },
    Region { code: 29, title: "Мурманская область", title_eng: "Murmansk region" },
    Region { code: 30, title: "Новгородская область", title_eng: "Novgorod region" },
    Region { code: 31, title: "Псковская область", title_eng: "Pskov region" },
    Region { code: 32, title: "г. Санкт-Петербург", title_eng: "The City of Sankt-Petersburg" },
    Region { code: 33, title: "Южный федеральный округ", title_eng: "The South Federal District" },
    Region { code: 34, title: "Республика Адыгея", title_eng: "Republic of Adygeya" },
    Region { code: 35, title: "Республика Дагестан", title_eng: "Republic of Dagestan" },
    Region { code: 36, title: "Республика Ингушетия", title_eng: "Republic of Ingushetia" },
    Region { code: 37, title: "Кабардино-Балкарская Республика", title_eng: "Kabardino-Balkarian Republic" },
    Region { code: 38, title: "Республика Калмыкия", title_eng: "Republic of Kalmykia" },
    Region { code: 39, title: "Карачаево-Черкесская Республика", title_eng: "Karachaevo-Chercessian Republic" },
    Region { code: 40, title: "Республика Северная Осетия - Алания", title_eng: "Republic of North Ossetia - Alania" },
    Region { code: 41, title: "Чеченская Республика", title_eng: "Chechen Republic" },
    Region { code: 42, title: "Краснодарский край", title_eng: "Krasnodar territory" },
    Region { code: 43, title: "Ставропольский край", title_eng: "Stavropol territory" },
    Region { code: 44, title: "Астраханская область", title_eng: "Astrakhan region" },
    Region { code: 45, title: "Волгоградская область", title_eng: "Volgograd region" },
    Region { code: 46, title: "Ростовская область", title_eng: "Rostov region" },
    Region { code: 47, title: "Приволжский федеральный округ", title_eng: "The Volga Federal District" },
    Region { code: 48, title: "Республика Башкортостан", title_eng: "Republic of Bashkortostan" },
    Region { code: 49, title: "Республика Марий Эл", title_eng: "Republic of Mari El" },
    Region { code: 50, title: "Республика Мордовия", title_eng: "Republic of Mordovia" },
    Region { code: 51, title: "Республика Татарстан", title_eng: "Republic of Tatarstan" },
    Region { code: 52, title: "Удмуртская Республика", title_eng: "Udmurt Republic" },
    Region { code: 53, title: "Чувашская Республика", title_eng: "Chuvash Republic" },
    Region { code: 54, title: "Пермский край", title_eng: "Perm territory" },
    Region { code: 55, title: "Кировская область", title_eng: "Kirov region" },
    Region { code: 56, title: "Нижегородская область", title_eng: "Nizhny Novgorod region" },
    Region { code: 57, title: "Оренбургская область", title_eng: "Orenburg region" },
    Region { code: 58, title: "Пензенская область", title_eng: "Penza region" },
    Region { code: 59, title: "Самарская область", title_eng: "Samara region" },
    Region { code: 60, title: "Саратовская область", title_eng: "Saratov region" },
    Region { code: 61, title: "Ульяновская область", title_eng: "Ulyanovsk region" },
    Region { code: 62, title: "Уральский федеральный округ", title_eng: "The Urals Federal District" },
    Region { code: 63, title: "Курганская область", title_eng: "Kurgan region" },
    Region { code: 64, title: "Свердловская область", title_eng: "Sverdlovsk region" },
    Region { code: 65, title: "Тюменская область", title_eng: "Tyumen region" },
    Region {
        code: 66,
        title: "в том числе Ханты-Мансийский автономный округ - Югра",
        title_eng: "Khanty-Mansi autonomous district - Yugra",
    },
    Region {
        code: 67,
        title: "в том числе Ямало-Ненецкий автономный округ",
        title_eng: "Yamalo-Nenets autonomous district",
    },
    Region {
        code: 670,
        title: "Тюменская область без данных по автономным округам",
        title_eng: "Tyumen region w/o autonomous districts",
    },
    Region { code: 68, title: "Челябинская область", title_eng: "Chelyabinsk region" },
    Region { code: 69, title: "Сибирский федеральный округ", title_eng: "The Siberian Federal District" },
    Region { code: 70, title: "Республика Алтай", title_eng: "Republic of Altai" },
    Region { code: 71, title: "Республика Бурятия", title_eng: "Republic of Buryatia" },
    Region { code: 72, title: "Республика Тыва", title_eng: "Republic of Tyva" },
    Region { code: 73, title: "Республика Хакасия", title_eng: "Republic of Khakassia" },
    Region { code: 74, title: "Алтайский край", title_eng: "Altai territory" },
    Region { code: 75, title: "Забайкальский край", title_eng: "Zabaikalsky territory" },
    Region { code: 76, title: "Красноярский край", title_eng: "Krasnoyarsk territory" },
    Region { code: 77, title: "Иркутская область", title_eng: "Irkutsk region" },
    Region { code: 78, title: "Кемеровская область", title_eng: "Kemerovo region" },
    Region { code: 79, title: "Новосибирская область", title_eng: "Novosibirsk region" },
    Region { code: 80, title: "Омская область", title_eng: "Omsk region" },
    Region { code: 81, title: "Томская область", title_eng: "Tomsk region" },
    Region { code: 82, title: "Дальневосточный федеральный округ", title_eng: "The Far East Federal District" },
    Region { code: 83, title: "Республика Саха (Якутия)", title_eng: "Republic of Sakha (Yakutia)" },
    Region { code: 84, title: "Приморский край", title_eng: "Primorsky territory" },
    Region { code: 85, title: "Хабаровский край", title_eng: "Khabarovsk territory" },
    Region { code: 86, title: "Амурская область", title_eng: "Amur region" },
    Region { code: 87, title: "Камчатский край", title_eng: "Kamchatka territory" },
    Region { code: 88, title: "Магаданская область", title_eng: "Magadan region" },
    Region { code: 89, title: "Сахалинская область", title_eng: "Sakhalin region" },
    Region { code: 90, title: "Еврейская автономная область", title_eng: "Jewish autonomous region" },
    Region { code: 91, title: "Чукотский автономный округ", title_eng: "Chukotka autonomous district" },
    Region { code: 92, title: "Республика Крым", title_eng: "Republic of Crimea" },
    Region { code: 93, title: "г. Севастополь", title_eng: "The City of Sevastopol" },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_region_codes_unique_and_positive() {
        let codes: HashSet<i32> = REGIONS.iter().map(|r| r.code).collect();
        assert_eq!(codes.len(), REGIONS.len());
        assert!(REGIONS.iter().all(|r| r.code > 0));
    }

    #[test]
    fn test_region_titles_unique() {
        let titles: HashSet<&str> = REGIONS.iter().map(|r| r.title).collect();
        assert_eq!(titles.len(), REGIONS.len());
        let titles_eng: HashSet<&str> = REGIONS.iter().map(|r| r.title_eng).collect();
        assert_eq!(titles_eng.len(), REGIONS.len());
    }

    #[test]
    fn test_region_titles_have_no_stray_whitespace() {
        for region in REGIONS {
            assert_eq!(region.title, region.title.trim());
            assert_eq!(region.title_eng, region.title_eng.trim());
            assert!(!region.title.is_empty());
            assert!(!region.title_eng.is_empty());
        }
    }

    #[test]
    fn test_moscow_is_seeded() {
        let moscow = REGIONS.iter().find(|r| r.title == "г. Москва").unwrap();
        assert_eq!(moscow.code, 20);
        assert_eq!(moscow.title_eng, "The City of Moscow");
    }
}
