use rand::Rng;

const CHROME_VERSIONS: [&str; 12] = [
    "133.0.6943.88",
    "132.0.6834.110",
    "131.0.6778.108",
    "130.0.6723.117",
    "129.0.6668.89",
    "128.0.6613.138",
    "127.0.6533.119",
    "126.0.6478.182",
    "125.0.6422.176",
    "124.0.6367.243",
    "123.0.6312.122",
    "122.0.6261.129",
];

const FIREFOX_VERSIONS: [&str; 10] = [
    "133.0", "132.0", "131.0", "130.0", "129.0", "128.0", "127.0", "126.0", "125.0", "124.0",
];

const EDGE_VERSIONS: [&str; 8] = [
    "133.0.3048.56",
    "132.0.2957.63",
    "131.0.2903.112",
    "130.0.2849.80",
    "129.0.2792.65",
    "128.0.2739.90",
    "127.0.2651.105",
    "126.0.2592.102",
];

const SAFARI_VERSIONS: [&str; 5] = ["18.2", "18.1", "18.0", "17.7", "17.6"];

const OS_STRINGS: [&str; 14] = [
    // Windows (modern versions more likely)
    "Windows NT 10.0; Win64; x64",
    "Windows NT 10.0; Win64; x64",
    "Windows NT 10.0; Win64; x64",
    "Windows NT 10.0; WOW64",
    // macOS
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 13_6_7",
    "Macintosh; Intel Mac OS X 14_7_1",
    "Macintosh; Intel Mac OS X 15_2",
    // Linux
    "X11; Linux x86_64",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
    "X11; Ubuntu 22.04; Linux x86_64",
    "X11; Fedora; Linux x86_64",
    "X11; Debian 12; Linux x86_64",
];

fn gen_chrome_ua() -> String {
    let mut rng = rand::rng();
    let version = CHROME_VERSIONS[rng.random_range(0..CHROME_VERSIONS.len())];
    let os = OS_STRINGS[rng.random_range(0..OS_STRINGS.len())];

    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
        os, version
    )
}

fn gen_firefox_ua() -> String {
    let mut rng = rand::rng();
    let version = FIREFOX_VERSIONS[rng.random_range(0..FIREFOX_VERSIONS.len())];
    let os = OS_STRINGS[rng.random_range(0..OS_STRINGS.len())];

    format!(
        "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
        os, version, version
    )
}

fn gen_edge_ua() -> String {
    let mut rng = rand::rng();
    let version = EDGE_VERSIONS[rng.random_range(0..EDGE_VERSIONS.len())];
    let os = OS_STRINGS[rng.random_range(0..OS_STRINGS.len())];
    let chrome_ver = version.split('.').next().unwrap_or("133");

    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.0.0 Safari/537.36 Edg/{}",
        os, chrome_ver, version
    )
}

fn gen_safari_ua() -> String {
    let mut rng = rand::rng();
    let macos_systems: Vec<&str> = OS_STRINGS
        .iter()
        .filter(|os| os.starts_with("Macintosh"))
        .copied()
        .collect();
    let os = macos_systems[rng.random_range(0..macos_systems.len())];
    let version = SAFARI_VERSIONS[rng.random_range(0..SAFARI_VERSIONS.len())];

    format!(
        "Mozilla/5.0 ({}) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{} Safari/605.1.15",
        os, version
    )
}

/// 隨機產生一個擬真的 User-Agent，降低被上游網站以預設簽章封鎖的機率。
pub fn gen_random_ua() -> String {
    let mut rng = rand::rng();
    match rng.random_range(0..10) {
        0..=4 => gen_chrome_ua(),  // 50% Chrome (most popular)
        5..=6 => gen_firefox_ua(), // 20% Firefox
        7..=8 => gen_edge_ua(),    // 20% Edge
        _ => gen_safari_ua(),      // 10% Safari
    }
}
