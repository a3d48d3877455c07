use std::{fmt, str::FromStr};

use rand::Rng;

use crate::matcher::display_name;

pub const FOOD_PLACEHOLDER: &str = "{food}";

/// Items never picked as the headline dish of a meal.
const SIDE_DISH_WORDS: [&str; 4] = ["rice", "pickle", "fryums", "tea"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    English,
    Hinglish,
    Tenglish,
    Tanglish,
    Malnglish,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Hinglish,
        Language::Tenglish,
        Language::Tanglish,
        Language::Malnglish,
    ];

    /// Unknown keys fall back to English.
    pub fn from_key(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            log::warn!("Unknown notification language, using English. [language = {key}]");
            Language::English
        })
    }

    pub fn key(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hinglish => "hinglish",
            Language::Tenglish => "tenglish",
            Language::Tanglish => "tanglish",
            Language::Malnglish => "malnglish",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hinglish => "Hinglish (Hindi + English)",
            Language::Tenglish => "Tenglish (Telugu + English)",
            Language::Tanglish => "Tanglish (Tamil + English)",
            Language::Malnglish => "Malnglish (Malayalam + English)",
        }
    }

    fn table(&self) -> &'static TemplateTable {
        match self {
            Language::English => &ENGLISH,
            Language::Hinglish => &HINGLISH,
            Language::Tenglish => &TENGLISH,
            Language::Tanglish => &TANGLISH,
            Language::Malnglish => &MALNGLISH,
        }
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|language| language.key() == key)
            .ok_or_else(|| anyhow::anyhow!("Unsupported language {s}"))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoodCategory {
    Chicken,
    Biryani,
    Dosa,
    Poori,
}

struct CategoryRule {
    category: FoodCategory,
    keywords: &'static [&'static str],
    display_name: &'static str,
}

/// First rule with a keyword in the meal's items wins.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: FoodCategory::Chicken,
        keywords: &["chicken"],
        display_name: "Chicken",
    },
    CategoryRule {
        category: FoodCategory::Biryani,
        keywords: &["biryani", "pulao"],
        display_name: "Biryani",
    },
    CategoryRule {
        category: FoodCategory::Dosa,
        keywords: &["dosa"],
        display_name: "Dosa",
    },
    CategoryRule {
        category: FoodCategory::Poori,
        keywords: &["poori"],
        display_name: "Poori",
    },
];

pub fn detect_category(items: &[String]) -> Option<FoodCategory> {
    detect_rule(items).map(|rule| rule.category)
}

fn detect_rule(items: &[String]) -> Option<&'static CategoryRule> {
    let joined = items.join(" ").to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| joined.contains(keyword)))
}

/// First item that is not a side dish, markers removed.
pub fn main_item(items: &[String]) -> Option<String> {
    items
        .iter()
        .map(|item| display_name(item))
        .find(|name| {
            let lower = name.to_lowercase();
            !name.is_empty() && !SIDE_DISH_WORDS.iter().any(|word| lower.contains(word))
        })
}

pub trait RandomSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same index (wrapped into range).
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.0 % len
    }
}

/// Builds the body of a "meal is starting" notification.
pub fn flirty_message(
    language: Language,
    meal_name: &str,
    items: &[String],
    random: &mut dyn RandomSource,
) -> String {
    let table = language.table();

    let (pool, food_name) = match detect_rule(items) {
        Some(rule) => {
            let pool = match table.category_pool(rule.category) {
                [] => table.default,
                pool => pool,
            };
            (pool, rule.display_name.to_string())
        }
        None => {
            let food_name = main_item(items).unwrap_or_else(|| meal_name.to_string());
            (table.default, food_name)
        }
    };

    let index = random.pick(pool.len()).min(pool.len() - 1);
    pool[index].replacen(FOOD_PLACEHOLDER, &food_name, 1)
}

/// Same as [`flirty_message`] but takes the persisted language key.
pub fn flirty_message_for_key(
    language: &str,
    meal_name: &str,
    items: &[String],
    random: &mut dyn RandomSource,
) -> String {
    flirty_message(Language::from_key(language), meal_name, items, random)
}

struct TemplateTable {
    default: &'static [&'static str],
    chicken: &'static [&'static str],
    biryani: &'static [&'static str],
    dosa: &'static [&'static str],
    poori: &'static [&'static str],
}

impl TemplateTable {
    fn category_pool(&self, category: FoodCategory) -> &'static [&'static str] {
        match category {
            FoodCategory::Chicken => self.chicken,
            FoodCategory::Biryani => self.biryani,
            FoodCategory::Dosa => self.dosa,
            FoodCategory::Poori => self.poori,
        }
    }
}

static ENGLISH: TemplateTable = TemplateTable {
    default: &[
        "Hey handsome, {food} is waiting for you. Don't break its heart! 💔",
        "Missing you... and so is the {food}. Come fast! 🏃‍♂️",
        "Your soulmate might not be here, but {food} definitely is! 😉",
        "Warning: {food} is looking extra hot today. Just like you! 🔥",
        "Relationship status: Committed to {food}. Join us? 💍",
        "Stop scrolling, start eating! {food} is calling your name. 📞",
        "If you love me, you'll come eat {food} right now. 🥺",
        "Forget your problems, {food} is the solution to everything. ✨",
        "You + {food} = A better love story than Twilight. 🧛‍♂️",
        "Don't play hard to get, {food} knows you want it. 😏",
    ],
    chicken: &[
        "Winner Winner Chicken Dinner! 🍗 Your bird is waiting.",
        "Leg piece or breast piece? This Chicken wants you either way! 😉",
        "The Chicken is dying to meet you... literally. 🐔",
        "It's cluckin' good! Don't miss out on this Chicken. 🤤",
        "Protein incoming! Your muscles need this Chicken. 💪",
    ],
    biryani: &[
        "Bae-ryani time! It's spicy, hot, and waiting for you. 🌶️",
        "Forget your ex, Biryani is the only true love. ❤️",
        "Life is short, eat the Biryani first! 🍛",
        "Keep calm and eat Biryani. It's waiting for you! 👑",
        "Paradise found! It's in this plate of Biryani. 🏝️",
    ],
    dosa: &[
        "You + Dosa = Match made in heaven. 🥞",
        "Crispy, hot, and ready to mingle. The Dosa, I mean. 😉",
        "Don't let this Dosa get cold... or lonely. 🥺",
        "Roast it like a Dosa! Come get yours now. 🔥",
    ],
    poori: &[
        "Feeling deflated? This Poori will puff you up! 🎈",
        "Hot Poori looking for a hot date. Is that you? 😏",
        "Don't burst my bubble, come eat this Poori! 🛁",
    ],
};

static HINGLISH: TemplateTable = TemplateTable {
    default: &[
        "Oye hoye! {food} bula raha hai, ab toh aa jao! 😉",
        "Tumhara intezaar toh sirf {food} hi kar raha hai. ❤️",
        "Pyaar vyaar sab dhoka hai, {food} kha lo mauka hai! 🏃‍♂️",
        "Arre suno! {food} thanda ho raha hai, dil mat todo uska. 💔",
        "Aaj {food} mein kuch khaas baat hai, bilkul tumhari tarah! ✨",
        "Bhai, bandi baad mein, pehle {food}! Priority set karo. 🛑",
        "Dil garden garden ho jayega, bas {food} kha lo! 🌸",
        "Zindagi na milegi dobara, par {food} milega! Aaja! 🎬",
        "Sharam mat kar, {food} tera hi intezaar kar raha hai. 😉",
        "Khaane mein sharam kaisi? {food} ready hai boss! 🍽️",
    ],
    chicken: &[
        "Murga ready hai boss! Bas aapki kami hai. 🍗",
        "Chicken calling! Pick up the phone... I mean spoon! 🥄",
        "Aaj toh Chicken party hai! Jaldi aao hero. 🦸‍♂️",
        "Leg piece pe tera haq hai! Aaja jaldi. 🍗",
        "Chicken shicken khaao, body banao! 💪",
    ],
    biryani: &[
        "Biryani ke bina kya jeena? Jaldi aao! 🍛",
        "Tum, Main aur Biryani... perfect date? 😉",
        "Khushboo toh aa rahi hogi? Biryani bula rahi hai! 👃",
        "Asli pyaar = Biryani. Baaki sab moh maya hai. 🧘‍♂️",
        "Biryani is emotion, samjha kar pagle! ❤️",
    ],
    dosa: &[
        "Dosa itna crispy, jitna tumhara attitude! 😎",
        "Sambhar ke bina Dosa adhoora, aur tumhare bina yeh meal. 🥺",
        "Garam garam Dosa, thanda mat hone dena! 🔥",
    ],
    poori: &[
        "Poori phool gayi hai khushi mein, tumhare aane ki khabar sunke! 🎈",
        "Aloo-Poori ka match, bilkul Rab Ne Bana Di Jodi! 💑",
    ],
};

static TENGLISH: TemplateTable = TemplateTable {
    default: &[
        "Arey hero, {food} ready ga undi! Nuvvu raakapothe adi feel avthundi. 🥺",
        "Nee kosam {food} waiting ikkada. Vachey mama! 🏃‍♂️",
        "Life lo love lekapoyina parledu, plate lo {food} unte chalu! ❤️",
        "Warning: Ee {food} chala hot guru, neelaage! 🔥",
        "Miss avvaku, {food} feel avthundi. Fast ga vachey! ⚡",
        "Asalu kick eh veru abba, {food} thinte! 🔥",
        "Nee crush kante {food} eh better, trust me! 😉",
        "Pahilwaan, {food} ready! Vachi kummey! 💪",
        "Life lo settlement kavali ante {food} thinali! 🍛",
        "Thinnama, padukunnama... anthe life! Vachey {food} thinu. 😴",
    ],
    chicken: &[
        "Kodi kura ready! Nuvvu raagane kummeddam. 🍗",
        "Chicken leg piece waiting for you mama! 😉",
        "Sunday aina Monday aina, Chicken unte pandage! 🎉",
        "Kodi koora chitti gaare... kaadu, just Chicken! Vachey! 😋",
        "Non-veg lenide mudda digadhu ga? Chicken ready! 🍖",
    ],
    biryani: &[
        "Biryani is emotion ra chari! Vachey twaraga. 🍛",
        "Nee love failure aiyundochu, kani Biryani eppudu fail avvadhu. ❤️",
        "Gama gama Biryani vasana... Aagalekapothunnam! 🤤",
        "Biryani thini, happy ga undu. Anthe claps! 👏",
        "Pulao kaadu ra, idi Biryani! Respect ivvali. 🫡",
    ],
    dosa: &[
        "Dosa ready, Chutney ready... Nuvvu okkadive balance! 🥞",
        "Masala Dosa kanna spicy evaru? Nuvve! 😉",
        "Roast ga Dosa vesanu, challaripothundi chudu! 🔥",
    ],
    poori: &[
        "Poori lu pongayi, nee potta nindali! Vachey! 🎈",
        "Kurma lo Poori munchi thinte... swargame! ☁️",
    ],
};

static TANGLISH: TemplateTable = TemplateTable {
    default: &[
        "Machan, {food} waiting! Nee varala na athu kavalai padum. 🥺",
        "Love pannurom illayo, {food} nalla saapdurom! ❤️",
        "Un aalu unna vittu pogalam, aana {food} pogathu. Vaa da! 🏃‍♂️",
        "Thalaiva, {food} ready! Mass kaatrom. 😎",
        "Vera level taste, miss pannidatha! {food} calling. 📞",
        "Vera level feeling venuma? {food} saapdu! ✨",
        "Un crush unna paaka maatan, aana {food} paakum. 😉",
        "Sothu mukkiyam bigil-u! {food} waiting. 🥘",
        "Thalaivaa, mass ah oru {food} virundhu waiting! 😎",
        "Vayiru nirambinal, manasu nirambum. Vaa saapda! 😌",
    ],
    chicken: &[
        "Chicken irukku, nee irukka... vera enna venum? 🍗",
        "Koli kari kuzhambu waiting thalaiva! 🥘",
        "Innaiku oru pudi, Chicken varuval! 🔥",
        "Chicken 65 ah? Illa 65 Chicken ah? Edhuva irundhalum vaa! 🐔",
        "Semma taste, vera level chicken! Miss pannidatha. 🤤",
    ],
    biryani: &[
        "Biryani love > True love. Unmai dhane? 😉",
        "Semma vasanai... Biryani waiting machi! 🍛",
        "Oru plate Biryani, oru full happiness. ❤️",
        "Biryani kedaikum bodhu, vera enna yosanai? Vaa! 🏃‍♂️",
        "Thalapakatti ah? Ambur ah? Edhuva irundhalum Biryani dhaan mass! 👑",
    ],
    dosa: &[
        "Dosa kal la iruku, nee enga irukka? 🥞",
        "Gethu kaatatha, Dosa saapdu! 😎",
        "Murugal Dosa, unakkaga waiting! 🔥",
    ],
    poori: &[
        "Poori-um Kilangu-um... Semma combination! Vaa machi. 🥔",
        "Ubbuna Poori, unakkaga dhaan! 🎈",
    ],
};

static MALNGLISH: TemplateTable = TemplateTable {
    default: &[
        "Aliya, {food} waiting aanu! Vegam vaa! 🏃‍♂️",
        "Nee illathe {food} oru rasam illa. 😉",
        "Mone, {food} poliyaanu! Miss aakkalle. 🔥",
        "Love venda, {food} mathi! ❤️",
        "Adipoli {food} aanu innathe special! ✨",
        "Scene contra aakkalle, vegam vannu {food} kazhikku! 🛑",
        "Poliyalle? {food} aanu mone main! 🔥",
        "Nee vaa, namukku {food} adichu polikkam! 🎉",
        "Chunk bro, {food} miss aakkalle! ❤️",
        "Vayaru niraye {food}, manassu niraye santhosham! 😌",
    ],
    chicken: &[
        "Chicken curry ready! Nammal polikkum. 🍗",
        "Kozhi waiting aanu aliya! 🐔",
        "Chicken porichathu... uff! Vaa vegam. 🤤",
        "Nalla naadan Chicken curry! Miss aakkalle. 🥘",
    ],
    biryani: &[
        "Biryani ishtam! Vegam vaayo. 🍛",
        "Dum Biryani aanu mone! Miss aakkalle. 🤤",
        "Biryani kandittu kothiyavunno? Vaa kazhikku! 😋",
        "Malabar Biryani aano? Alla, pakshe taste adipoli! 😉",
    ],
    dosa: &[
        "Dosa chuttathu ready! Chammanthi kooti kazhikku. 🥞",
        "Nalla crispy Dosa! Vaa mone. 😎",
    ],
    poori: &[
        "Poori-um Bhaji-um... Adipoli combo! 🥔",
        "Poori waiting aanu, nee evideya? 🎈",
    ],
};
