//! Static knowledge records consulted by the router before any network lookup.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalEvent {
    pub date: &'static str,
    pub event: &'static str,
    pub importance: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportantDay {
    /// "{day} {Turkish month}", e.g. "29 Ekim".
    pub date: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeographyEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub continent: &'static str,
    pub capital: Option<&'static str>,
    pub population: Option<&'static str>,
    pub area: Option<&'static str>,
    pub facts: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CultureEntry {
    /// Folded canonical country name.
    pub key: &'static str,
    pub country: &'static str,
    pub language: &'static str,
    pub cuisine: &'static str,
    pub traditions: &'static str,
    pub landmarks: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityWeather {
    pub key: &'static str,
    pub display: &'static str,
    pub temp_c: i32,
    pub condition: &'static str,
}

/// Maps a spoken country name to its canonical form and, when the country is on the
/// globe, its catalog id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryAlias {
    pub alias: &'static str,
    pub canonical: &'static str,
    pub catalog_id: Option<&'static str>,
}

pub const GREETING_KEYWORDS: &[&str] = &["merhaba", "selam"];
pub const IDENTITY_KEYWORDS: &[&str] = &["adın ne", "kimsin"];
pub const SMALL_TALK_KEYWORDS: &[&str] = &["nasılsın", "iyi misin"];
pub const TIME_KEYWORDS: &[&str] = &["saat kaç", "tarih", "bugün günlerden", "bugün ne"];
pub const WEATHER_KEYWORDS: &[&str] = &["hava durumu", "hava nasıl", "yağmur", "sıcaklık"];
pub const HISTORY_KEYWORDS: &[&str] = &[
    "tarih",
    "savaş",
    "kuruluş",
    "devrim",
    "meydan muharebesi",
    "fetih",
    "tarihi olay",
    "ne zaman oldu",
];
pub const DAY_KEYWORDS: &[&str] = &["bayram", "özel gün", "kutlama", "anma günü", "bugün özel", "önemli gün"];
pub const TODAY_KEYWORDS: &[&str] = &["bugün", "günümüz"];
pub const GEOGRAPHY_KEYWORDS: &[&str] = &["nerede", "coğrafya", "dağ", "nehir", "göl", "deniz", "okyanus", "kıta", "ada"];
pub const CULTURE_KEYWORDS: &[&str] = &["kültür", "gelenek", "yemek", "mutfak"];

/// Interrogatives removed before a free-text encyclopedia search. Multi-word entries
/// come first so they are removed whole.
pub const STOP_WORDS: &[&str] = &[
    "ne zaman",
    "bilgi ver",
    "nereden",
    "nerede",
    "nedir",
    "neden",
    "niçin",
    "hakkında",
    "anlat",
    "kimin",
    "hangi",
    "nasıl",
    "kim",
    "kaç",
    "ne",
];

pub const MONTHS_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim", "Kasım", "Aralık",
];

pub const WEEKDAYS_TR: [&str; 7] = ["Pazartesi", "Salı", "Çarşamba", "Perşembe", "Cuma", "Cumartesi", "Pazar"];

pub const COUNTRY_ALIASES: &[CountryAlias] = &[
    CountryAlias { alias: "türkiye", canonical: "Türkiye", catalog_id: Some("turkey") },
    CountryAlias { alias: "amerika", canonical: "Amerika Birleşik Devletleri", catalog_id: Some("usa") },
    CountryAlias { alias: "abd", canonical: "Amerika Birleşik Devletleri", catalog_id: Some("usa") },
    CountryAlias { alias: "fransa", canonical: "Fransa", catalog_id: Some("france") },
    CountryAlias { alias: "japonya", canonical: "Japonya", catalog_id: Some("japan") },
    CountryAlias { alias: "brezilya", canonical: "Brezilya", catalog_id: Some("brazil") },
    CountryAlias { alias: "çin", canonical: "Çin Halk Cumhuriyeti", catalog_id: Some("china") },
    CountryAlias { alias: "almanya", canonical: "Almanya", catalog_id: Some("germany") },
    CountryAlias { alias: "italya", canonical: "İtalya", catalog_id: Some("italy") },
    CountryAlias { alias: "ispanya", canonical: "İspanya", catalog_id: Some("spain") },
    CountryAlias { alias: "ingiltere", canonical: "Birleşik Krallık", catalog_id: Some("uk") },
    CountryAlias { alias: "rusya", canonical: "Rusya", catalog_id: Some("russia") },
    CountryAlias { alias: "kanada", canonical: "Kanada", catalog_id: Some("canada") },
    CountryAlias { alias: "avustralya", canonical: "Avustralya", catalog_id: Some("australia") },
    CountryAlias { alias: "hindistan", canonical: "Hindistan", catalog_id: Some("india") },
    CountryAlias { alias: "mısır", canonical: "Mısır", catalog_id: Some("egypt") },
];

pub const WEATHER: &[CityWeather] = &[
    CityWeather { key: "istanbul", display: "İstanbul", temp_c: 22, condition: "güneşli" },
    CityWeather { key: "ankara", display: "Ankara", temp_c: 18, condition: "parçalı bulutlu" },
    CityWeather { key: "izmir", display: "İzmir", temp_c: 25, condition: "açık" },
    CityWeather { key: "antalya", display: "Antalya", temp_c: 28, condition: "güneşli" },
    CityWeather { key: "bursa", display: "Bursa", temp_c: 20, condition: "yağmurlu" },
    CityWeather { key: "adana", display: "Adana", temp_c: 30, condition: "açık" },
    CityWeather { key: "konya", display: "Konya", temp_c: 17, condition: "bulutlu" },
    CityWeather { key: "paris", display: "Paris", temp_c: 16, condition: "yağmurlu" },
    CityWeather { key: "londra", display: "Londra", temp_c: 14, condition: "sisli" },
    CityWeather { key: "new york", display: "New York", temp_c: 18, condition: "parçalı bulutlu" },
    CityWeather { key: "tokyo", display: "Tokyo", temp_c: 20, condition: "yağmurlu" },
    CityWeather { key: "pekin", display: "Pekin", temp_c: 19, condition: "bulutlu" },
];

pub const HISTORICAL_EVENTS: &[HistoricalEvent] = &[
    HistoricalEvent {
        date: "29 Ekim 1923",
        event: "Türkiye Cumhuriyeti'nin ilanı",
        importance: "Türk tarihinde dönüm noktası",
    },
    HistoricalEvent {
        date: "19 Mayıs 1919",
        event: "Mustafa Kemal'in Samsun'a çıkışı",
        importance: "Kurtuluş Savaşı'nın başlangıcı",
    },
    HistoricalEvent {
        date: "30 Ağustos 1922",
        event: "Büyük Taarruz ve Dumlupınar Zaferi",
        importance: "Kurtuluş Savaşı'nın dönüm noktası",
    },
    HistoricalEvent {
        date: "10 Kasım 1938",
        event: "Mustafa Kemal Atatürk'ün vefatı",
        importance: "Ulusal yas günü",
    },
    HistoricalEvent {
        date: "23 Nisan 1920",
        event: "Türkiye Büyük Millet Meclisi'nin açılışı",
        importance: "Ulusal egemenlik ve çocuk bayramı",
    },
    HistoricalEvent {
        date: "1 Ocak 1923",
        event: "Miladi takvimin kabulü",
        importance: "Modernleşme hareketi",
    },
    HistoricalEvent {
        date: "3 Mart 1924",
        event: "Halifeliğin kaldırılması",
        importance: "Laiklik ilkesine geçiş",
    },
    HistoricalEvent {
        date: "14 Temmuz 1789",
        event: "Fransız Devrimi: Bastille Baskını",
        importance: "Dünya tarihinde dönüm noktası",
    },
    HistoricalEvent {
        date: "4 Temmuz 1776",
        event: "Amerikan Bağımsızlık Bildirgesi'nin ilanı",
        importance: "Amerika Birleşik Devletleri'nin kuruluşu",
    },
    HistoricalEvent {
        date: "12 Ekim 1492",
        event: "Kristof Kolomb'un Amerika kıtasına ulaşması",
        importance: "Yeni Dünya'nın keşfi",
    },
    HistoricalEvent {
        date: "1453",
        event: "İstanbul'un Fethi",
        importance: "Orta Çağ'ın sonu, Yeni Çağ'ın başlangıcı",
    },
    HistoricalEvent {
        date: "1071",
        event: "Malazgirt Zaferi",
        importance: "Türklerin Anadolu'ya yerleşmesi",
    },
    HistoricalEvent {
        date: "632",
        event: "Hz. Muhammed'in vefatı",
        importance: "İslam tarihinde dönüm noktası",
    },
    HistoricalEvent {
        date: "1914-1918",
        event: "Birinci Dünya Savaşı",
        importance: "Global çatışma",
    },
    HistoricalEvent {
        date: "1939-1945",
        event: "İkinci Dünya Savaşı",
        importance: "Modern tarihin en büyük savaşı",
    },
    HistoricalEvent {
        date: "9 Kasım 1989",
        event: "Berlin Duvarı'nın yıkılışı",
        importance: "Soğuk Savaş'ın sonu",
    },
    HistoricalEvent {
        date: "20 Temmuz 1969",
        event: "Apollo 11 ile ilk insanın Ay'a ayak basması",
        importance: "Uzay çağında dönüm noktası",
    },
];

pub const IMPORTANT_DAYS: &[ImportantDay] = &[
    ImportantDay { date: "1 Ocak", name: "Yılbaşı", description: "Yeni yılın başlangıcı" },
    ImportantDay {
        date: "8 Mart",
        name: "Dünya Kadınlar Günü",
        description: "Kadın hakları ve uluslararası barış günü",
    },
    ImportantDay {
        date: "23 Nisan",
        name: "Ulusal Egemenlik ve Çocuk Bayramı",
        description: "TBMM'nin açılışı ve çocuklara armağan edilen bayram",
    },
    ImportantDay { date: "1 Mayıs", name: "İşçi Bayramı", description: "Emek ve dayanışma günü" },
    ImportantDay {
        date: "19 Mayıs",
        name: "Atatürk'ü Anma, Gençlik ve Spor Bayramı",
        description: "Atatürk'ün Samsun'a çıkışını anma günü",
    },
    ImportantDay {
        date: "5 Haziran",
        name: "Dünya Çevre Günü",
        description: "Çevre koruma ve sürdürülebilirlik bilincini artırma günü",
    },
    ImportantDay {
        date: "30 Ağustos",
        name: "Zafer Bayramı",
        description: "Büyük Taarruz ve Dumlupınar Zaferi'nin anma günü",
    },
    ImportantDay {
        date: "29 Ekim",
        name: "Cumhuriyet Bayramı",
        description: "Türkiye Cumhuriyeti'nin kuruluş günü",
    },
    ImportantDay { date: "10 Kasım", name: "Atatürk'ü Anma Günü", description: "Atatürk'ün ölüm yıldönümü" },
    ImportantDay {
        date: "24 Kasım",
        name: "Öğretmenler Günü",
        description: "Öğretmenlere saygı ve minnet günü",
    },
];

pub const GEOGRAPHY: &[GeographyEntry] = &[
    GeographyEntry {
        key: "türkiye",
        name: "Türkiye",
        continent: "Asya ve Avrupa",
        capital: Some("Ankara"),
        population: Some("84 milyon (2021)"),
        area: Some("783,356 km²"),
        facts: &[
            "Türkiye, Asya ve Avrupa kıtalarını birbirine bağlayan bir köprü konumundadır.",
            "Ülke topraklarının %97'si Asya'da, %3'ü Avrupa'dadır.",
            "Türkiye'nin en yüksek noktası 5.137 metre ile Ağrı Dağı'dır.",
            "Van Gölü, Türkiye'nin en büyük gölüdür ve bir sodalı göldür.",
            "Türkiye'de 7 coğrafi bölge vardır: Marmara, Ege, Akdeniz, Karadeniz, İç Anadolu, Doğu Anadolu ve Güneydoğu Anadolu.",
        ],
    },
    GeographyEntry {
        key: "akdeniz",
        name: "Akdeniz",
        continent: "Avrupa, Asya ve Afrika arasında",
        capital: None,
        population: None,
        area: None,
        facts: &[
            "Akdeniz, dünyanın en büyük iç denizidir.",
            "Cebelitarık Boğazı ile Atlas Okyanusu'na bağlanır.",
            "Akdeniz'in ortalama derinliği 1.500 metredir.",
            "Akdeniz'e kıyısı olan 21 ülke vardır.",
            "Akdeniz iklimi, sıcak ve kurak yazlar ile ılık ve yağışlı kışlarla karakterizedir.",
        ],
    },
    GeographyEntry {
        key: "himalayalar",
        name: "Himalayalar",
        continent: "Asya",
        capital: None,
        population: None,
        area: None,
        facts: &[
            "Himalayalar, dünyanın en yüksek dağ sırasıdır.",
            "Dünya'nın en yüksek 10 zirvesinin tamamı Himalayalarda yer alır.",
            "En yüksek nokta olan Everest Dağı 8.848 metredir.",
            "Himalayalar, Hindistan ve Avrasya levhalarının çarpışması sonucu oluşmuştur.",
            "Bölge, Tibet Platosu ve Güney Asya arasında doğal bir sınır oluşturur.",
        ],
    },
];

pub const CULTURE: &[CultureEntry] = &[
    CultureEntry {
        key: "türkiye",
        country: "Türkiye",
        language: "Türkçe",
        cuisine: "Kebap, baklava, döner, köfte, mantı, börek",
        traditions: "Ramazan Bayramı, Kurban Bayramı, halk oyunları, el sanatları",
        landmarks: "Kapadokya, Pamukkale, Ayasofya, Efes Antik Kenti, Nemrut Dağı",
    },
    CultureEntry {
        key: "japonya",
        country: "Japonya",
        language: "Japonca",
        cuisine: "Suşi, ramen, tempura, miso çorbası",
        traditions: "Çay seremonisi, ikebana, kimonolar, Sakura festivali",
        landmarks: "Fuji Dağı, Tokyo Kulesi, Kyoto tapınakları",
    },
    CultureEntry {
        key: "fransa",
        country: "Fransa",
        language: "Fransızca",
        cuisine: "Croissant, şaraplar, peynirler, ratatouille",
        traditions: "14 Temmuz Bastille Günü, festivaller, moda",
        landmarks: "Eyfel Kulesi, Louvre Müzesi, Notre Dame Katedrali",
    },
    CultureEntry {
        key: "mısır",
        country: "Mısır",
        language: "Arapça",
        cuisine: "Köshari, falafel, mulukhiyah, baklava",
        traditions: "Ramadan kutlamaları, halk dansları, el sanatları",
        landmarks: "Piramitler, Sfenks, Kahire Müzesi, Nil Nehri",
    },
];
