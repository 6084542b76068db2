use std::collections::HashMap;

use lazy_static::lazy_static;

use super::country::canonicalize_country;
use super::normalize::normalize_key;

type RegionTable = &'static [(&'static str, &'static [&'static str])];

/// Canonical regions per canonical country, each with its aliases
/// (sub-regions, appellations, other-language spellings) as lookup keys.
const REGIONS: &[(&str, RegionTable)] = &[
    (
        "Frankreich",
        &[
            (
                "Burgund",
                &[
                    "bourgogne", "burgundy", "borgogna", "chablis", "cotedor", "cotedenuits",
                    "cotedebeaune", "gevreychambertin", "chambollemusigny", "vosneromanee",
                    "nuitssaintgeorges", "pommard", "volnay", "meursault", "pulignymontrachet",
                    "chassagnemontrachet", "corton", "maconnais", "macon", "pouillyfuisse",
                    "cotechalonnaise", "mercurey", "givry",
                ],
            ),
            (
                "Beaujolais",
                &[
                    "morgon", "fleurie", "moulinavent", "brouilly", "julienas", "chenas",
                    "chiroubles", "regnie", "saintamour",
                ],
            ),
            (
                "Bordeaux",
                &[
                    "bordelais", "medoc", "hautmedoc", "pauillac", "margaux", "saintjulien",
                    "saintestephe", "saintemilion", "pomerol", "pessacleognan", "graves",
                    "sauternes", "barsac", "entredeuxmers", "fronsac", "listracmedoc", "moulis",
                ],
            ),
            (
                "Rhône (Nord & Süd)",
                &[
                    "rhone", "cotesdurhone", "rhonenord", "rhonesud", "nordrhone", "sudrhone",
                    "northernrhone", "southernrhone", "chateauneufdupape", "hermitage",
                    "crozeshermitage", "cotierotie", "condrieu", "gigondas", "vacqueyras",
                    "saintjoseph", "cornas", "tavel", "lirac", "rasteau", "cairanne", "ventoux",
                ],
            ),
            (
                "Champagne",
                &[
                    "champenois", "montagnedereims", "cotedesblancs", "valleedelamarne",
                    "cotedesbar",
                ],
            ),
            (
                "Loire",
                &[
                    "valdeloire", "loiretal", "loirevalley", "sancerre", "pouillyfume", "vouvray",
                    "chinon", "bourgueil", "muscadet", "saumur", "anjou", "savennieres",
                    "touraine", "menetousalon", "quincy", "montlouis",
                ],
            ),
            ("Elsass", &["alsace", "alsacegrandcru"]),
            (
                "Languedoc-Roussillon",
                &[
                    "languedoc", "roussillon", "minervois", "corbieres", "faugeres",
                    "picsaintloup", "fitou", "collioure", "banyuls", "saintchinian", "limoux",
                ],
            ),
            (
                "Provence",
                &["cotesdeprovence", "bandol", "cassis", "bellet", "palette"],
            ),
            (
                "Südwestfrankreich",
                &[
                    "sudouest", "southwestfrance", "cahors", "madiran", "jurancon", "bergerac",
                    "gaillac", "irouleguy", "monbazillac",
                ],
            ),
            ("Jura", &["arbois", "chateauchalon", "cotesdujura"]),
            ("Savoie", &["savoyen", "savoy"]),
            ("Korsika", &["corse", "corsica", "patrimonio", "ajaccio"]),
        ],
    ),
    (
        "Italien",
        &[
            (
                "Piemont",
                &[
                    "piemonte", "piedmont", "barolo", "barbaresco", "roero", "langhe",
                    "gattinara", "ghemme", "asti", "gavi", "dogliani",
                ],
            ),
            (
                "Toskana",
                &[
                    "toscana", "tuscany", "toscane", "chianti", "chianticlassico",
                    "brunellodimontalcino", "montalcino", "vinonobiledimontepulciano",
                    "montepulciano", "bolgheri", "maremma", "carmignano", "sangimignano",
                    "morellinodiscansano",
                ],
            ),
            (
                "Venetien",
                &[
                    "veneto", "venetia", "valpolicella", "amarone", "amaronedellavalpolicella",
                    "soave", "bardolino", "prosecco", "conegliano", "valdobbiadene", "lugana",
                ],
            ),
            (
                "Lombardei",
                &["lombardia", "lombardy", "franciacorta", "valtellina", "oltrepopavese"],
            ),
            ("Südtirol", &["altoadige", "southtyrol", "sudtirolaltoadige"]),
            ("Trentino", &["trento", "trentodoc"]),
            ("Friaul", &["friuli", "friuliveneziagiulia", "collio", "colliorientali"]),
            ("Abruzzen", &["abruzzo", "abruzzi", "montepulcianodabruzzo"]),
            ("Apulien", &["puglia", "apulia", "primitivodimanduria", "salento", "manduria"]),
            ("Kampanien", &["campania", "taurasi", "fianodiavellino", "grecoditufo"]),
            ("Sizilien", &["sicilia", "sicily", "etna", "marsala", "vittoria"]),
            ("Sardinien", &["sardegna", "sardinia"]),
            ("Marken", &["marche", "verdicchio"]),
            ("Umbrien", &["umbria", "montefalco", "orvieto"]),
            ("Emilia-Romagna", &["emilia", "romagna", "lambrusco"]),
        ],
    ),
    (
        "Spanien",
        &[
            ("Rioja", &["riojaalta", "riojaalavesa", "riojaoriental", "riojabaja"]),
            ("Ribera del Duero", &["ribera"]),
            ("Priorat", &["priorato"]),
            ("Montsant", &[]),
            ("Rías Baixas", &["riasbajas"]),
            ("Jerez", &["sherry", "xeres", "jerezxeressherry", "manzanilla", "sanlucar"]),
            ("Navarra", &["navarre"]),
            ("Penedès", &[]),
            ("Toro", &[]),
            ("Rueda", &[]),
            ("Bierzo", &[]),
            ("Castilla y León", &["vinodelatierradecastillayleon"]),
            ("La Mancha", &["valdepenas"]),
            ("Jumilla", &[]),
        ],
    ),
    (
        "Deutschland",
        &[
            ("Mosel", &["moselsaarruwer", "saar", "ruwer"]),
            ("Rheingau", &[]),
            ("Rheinhessen", &[]),
            ("Pfalz", &["palatinate"]),
            ("Nahe", &[]),
            ("Franken", &["franconia"]),
            ("Baden", &["kaiserstuhl"]),
            ("Württemberg", &["wuerttemberg"]),
            ("Ahr", &[]),
            ("Sachsen", &["saxony"]),
            ("Saale-Unstrut", &[]),
            ("Mittelrhein", &[]),
        ],
    ),
    (
        "Österreich",
        &[
            ("Wachau", &[]),
            ("Kamptal", &[]),
            ("Kremstal", &[]),
            ("Traisental", &[]),
            ("Wagram", &[]),
            ("Weinviertel", &[]),
            ("Thermenregion", &[]),
            ("Carnuntum", &[]),
            (
                "Burgenland",
                &["neusiedlersee", "leithaberg", "mittelburgenland", "sudburgenland"],
            ),
            ("Steiermark", &["styria", "sudsteiermark", "vulkanland"]),
            ("Wien", &["vienna"]),
        ],
    ),
    (
        "Schweiz",
        &[
            ("Wallis", &["valais"]),
            ("Waadt", &["vaud", "lavaux"]),
            ("Tessin", &["ticino"]),
            ("Graubünden", &["bundnerherrschaft"]),
            ("Genf", &["geneve", "geneva"]),
            ("Neuenburg", &["neuchatel"]),
        ],
    ),
    (
        "Portugal",
        &[
            ("Douro", &["dourovalley", "porto", "port"]),
            ("Alentejo", &[]),
            ("Dão", &[]),
            ("Vinho Verde", &[]),
            ("Bairrada", &[]),
            ("Madeira", &[]),
            ("Lisboa", &["lisbon"]),
            ("Setúbal", &[]),
        ],
    ),
    (
        "USA",
        &[
            (
                "Napa Valley",
                &["napa", "oakville", "rutherford", "stagsleap", "howellmountain", "calistoga"],
            ),
            (
                "Sonoma",
                &[
                    "sonomacoast", "sonomacounty", "russianriver", "russianrivervalley",
                    "drycreekvalley", "alexandervalley",
                ],
            ),
            (
                "Central Coast",
                &["pasorobles", "santabarbara", "santaritahills", "santaluciahighlands"],
            ),
            ("Kalifornien", &["california"]),
            ("Oregon", &["willamette", "willamettevalley"]),
            (
                "Washington",
                &["washingtonstate", "columbiavalley", "wallawalla"],
            ),
            ("New York", &["fingerlakes"]),
        ],
    ),
    (
        "Argentinien",
        &[
            ("Mendoza", &["lujandecuyo", "valledeuco", "uco"]),
            ("Salta", &["cafayate"]),
            ("Patagonien", &["patagonia", "neuquen", "rionegro"]),
            ("La Rioja", &["rioja"]),
            ("San Juan", &[]),
        ],
    ),
    (
        "Chile",
        &[
            ("Maipo", &["maipovalley", "valledelmaipo"]),
            ("Colchagua", &[]),
            ("Casablanca", &[]),
            ("Aconcagua", &[]),
            ("Maule", &[]),
            ("Limarí", &[]),
            ("Rapel", &["cachapoal"]),
        ],
    ),
    (
        "Australien",
        &[
            ("Barossa Valley", &["barossa", "edenvalley"]),
            ("McLaren Vale", &[]),
            ("Margaret River", &[]),
            ("Hunter Valley", &["hunter"]),
            ("Yarra Valley", &["yarra"]),
            ("Coonawarra", &[]),
            ("Clare Valley", &[]),
            ("Tasmanien", &["tasmania"]),
        ],
    ),
    (
        "Neuseeland",
        &[
            ("Marlborough", &[]),
            ("Central Otago", &[]),
            ("Hawke's Bay", &[]),
            ("Martinborough", &["wairarapa"]),
            ("Gisborne", &[]),
        ],
    ),
    (
        "Südafrika",
        &[
            ("Stellenbosch", &[]),
            ("Swartland", &[]),
            ("Paarl", &[]),
            ("Constantia", &[]),
            ("Franschhoek", &[]),
            ("Walker Bay", &["hemelenaarde"]),
        ],
    ),
    (
        "Griechenland",
        &[("Santorini", &[]), ("Naoussa", &[]), ("Nemea", &[])],
    ),
    (
        "Ungarn",
        &[
            ("Tokaj", &["tokaji", "tokay"]),
            ("Villány", &[]),
            ("Eger", &["egri"]),
        ],
    ),
];

/// Aliases shorter than this only match exactly; "asti" or "toro" would
/// otherwise hit far too many unrelated names.
const MIN_CONTAINMENT_LEN: usize = 5;

/// Appellation markers dropped from the end of a key on a second exact try.
const DESIGNATION_SUFFIXES: &[&str] = &[
    "docg", "doca", "aoc", "aop", "doc", "dop", "igt", "igp", "ava", "qba", "do",
];

const PART_DELIMITERS: &[char] = &[',', '/', ';', '|'];

struct AliasIndex {
    exact: HashMap<String, &'static str>,
    /// Longest alias first, ties in declaration order
    containment: Vec<(String, &'static str)>,
}

impl AliasIndex {
    fn build<'a>(entries: impl Iterator<Item = &'a (&'static str, &'static [&'static str])>) -> Self {
        let mut exact = HashMap::new();
        let mut containment = Vec::new();

        for (canonical, aliases) in entries {
            let own = normalize_key(canonical);
            let keys = std::iter::once(own).chain(aliases.iter().map(|a| (*a).to_string()));
            for key in keys {
                exact.entry(key.clone()).or_insert(*canonical);
                containment.push((key, *canonical));
            }
        }

        containment.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self { exact, containment }
    }

    fn exact(&self, key: &str) -> Option<&'static str> {
        if let Some(found) = self.exact.get(key) {
            return Some(*found);
        }
        DESIGNATION_SUFFIXES
            .iter()
            .filter_map(|suffix| key.strip_suffix(suffix))
            .filter(|stripped| !stripped.is_empty())
            .find_map(|stripped| self.exact.get(stripped).copied())
    }

    fn contained_in(&self, key: &str) -> Option<&'static str> {
        self.containment
            .iter()
            .filter(|(alias, _)| alias.len() >= MIN_CONTAINMENT_LEN)
            .find(|(alias, _)| key.contains(alias.as_str()))
            .map(|(_, canonical)| *canonical)
    }
}

lazy_static! {
    static ref BY_COUNTRY: HashMap<&'static str, AliasIndex> = REGIONS
        .iter()
        .map(|(country, regions)| (*country, AliasIndex::build(regions.iter())))
        .collect();
    static ref GLOBAL: AliasIndex =
        AliasIndex::build(REGIONS.iter().flat_map(|(_, regions)| regions.iter()));
}

/// Maps a free-text region onto its canonical name, using the country (in
/// any spelling) to disambiguate names that exist in several countries.
///
/// Candidates are the whole input followed by each `,` `/` `;` `|` separated
/// part. Lookup stages run in a fixed order, each over all candidates: exact
/// key in the country's table, containment in the country's aliases, exact
/// key in the global table, containment in the global aliases. First hit wins,
/// so the wine's own country always beats a name from another country.
/// Unresolved input is returned trimmed.
///
/// ```
/// use storage::canonical::canonicalize_region;
///
/// assert_eq!(canonicalize_region("Bourgogne", Some("France")), "Burgund");
/// assert_eq!(canonicalize_region("Gevrey-Chambertin 1er Cru", None), "Burgund");
/// ```
pub fn canonicalize_region(input: &str, country: Option<&str>) -> String {
    let scoped = country
        .map(canonicalize_country)
        .and_then(|c| BY_COUNTRY.get(c.as_str()));

    let parts: Vec<&str> = input
        .split(PART_DELIMITERS)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut candidates = vec![input];
    if parts.len() > 1 {
        candidates.extend(parts);
    }
    let keys: Vec<String> = candidates
        .into_iter()
        .map(normalize_key)
        .filter(|key| !key.is_empty())
        .collect();

    resolve(&keys, scoped)
        .map(str::to_string)
        .unwrap_or_else(|| input.trim().to_string())
}

fn resolve(keys: &[String], scoped: Option<&AliasIndex>) -> Option<&'static str> {
    let exact_scoped = || keys.iter().find_map(|k| scoped.and_then(|index| index.exact(k)));
    let exact_global = || keys.iter().find_map(|k| GLOBAL.exact(k));
    let contained_scoped =
        || keys.iter().find_map(|k| scoped.and_then(|index| index.contained_in(k)));
    let contained_global = || keys.iter().find_map(|k| GLOBAL.contained_in(k));

    exact_scoped()
        .or_else(contained_scoped)
        .or_else(exact_global)
        .or_else(contained_global)
}
