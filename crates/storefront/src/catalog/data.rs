//! Hard-coded product and deal tables.

use glowglaz_core::{Money, ProductId};

use super::{Bundle, Category, Deal, Product, ValueBadge};

fn badge(code: &str, name: &str) -> ValueBadge {
    ValueBadge {
        code: code.to_owned(),
        name: name.to_owned(),
    }
}

fn gallery(slug: &str) -> Vec<String> {
    (1..=4)
        .map(|n| format!("/static/images/products/{slug}-{n}.jpg"))
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

pub(super) fn products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            title: "Sampoorn Arogya Herbal Supplement".to_owned(),
            description: "Revitalize your body from within with Sampoorn Arogya, an all-in-one \
                Ayurvedic supplement crafted to strengthen immunity, improve digestion, and \
                boost daily energy."
                .to_owned(),
            price: Money::rupees(3990),
            images: gallery("sampoorn-arogya"),
            badge: Some("New".to_owned()),
            ingredients: "Ashwagandha, Triphala, Shatavari, Guduchi, Brahmi, Turmeric, Ginger, \
                Pippali, and other traditional Ayurvedic herbs."
                .to_owned(),
            allergens: strings(&["No known allergens"]),
            values: vec![
                badge("AY", "Ayurvedic"),
                badge("HB", "Herbal"),
                badge("VG", "Vegetarian"),
            ],
            category: Category::AyurvedicMedicine,
            in_stock: true,
        },
        Product {
            id: ProductId::new(2),
            title: "Dr. Joints Advanced Joint Health Formula".to_owned(),
            description: "Your daily dose of comfort and flexibility. Powered by FruiteX-B and \
                key joint-support nutrients, this formula helps reduce stiffness and ease \
                movement."
                .to_owned(),
            price: Money::rupees(3990),
            images: gallery("dr-joints"),
            badge: Some("Bestseller".to_owned()),
            ingredients: "FruiteX-B (calcium fructoborate), Glucosamine Sulfate, Chondroitin \
                Sulfate, MSM (Methylsulfonylmethane), Boswellia Extract, Turmeric Extract, \
                Ginger Extract."
                .to_owned(),
            allergens: strings(&["Shellfish (from Glucosamine)"]),
            values: vec![
                badge("JH", "Joint Health"),
                badge("AI", "Anti-Inflammatory"),
                badge("CT", "Clinically Tested"),
            ],
            category: Category::JointHealth,
            in_stock: true,
        },
        Product {
            id: ProductId::new(3),
            title: "Beyond Slim Ayurvedic Slimming Oil".to_owned(),
            description: "Target stubborn fat, tone your body, and nourish your skin with potent \
                herbal extracts and time-tested Ayurvedic ingredients."
                .to_owned(),
            price: Money::rupees(3990),
            images: gallery("beyond-slim"),
            badge: Some("Popular".to_owned()),
            ingredients: "Sesame Oil, Castor Oil, Garlic Extract, Cinnamon Oil, Eucalyptus Oil, \
                Ginger Extract, Lemon Oil, Camphor, Ajwain Oil, Clove Oil, Ayurvedic Herbs."
                .to_owned(),
            allergens: Vec::new(),
            values: vec![
                badge("AI", "Ayurvedic Ingredients"),
                badge("VF", "Vegan & Cruelty-Free"),
                badge("NS", "No Synthetic Additives"),
            ],
            category: Category::BodySlim,
            in_stock: true,
        },
        Product {
            id: ProductId::new(4),
            title: "PSORIGO Body Lotion".to_owned(),
            description: "Soothe, hydrate, and heal skin prone to psoriasis. Helps reduce \
                flaking, calm irritation, and restore natural softness."
                .to_owned(),
            price: Money::rupees(1499),
            images: gallery("psorigo-lotion"),
            badge: Some("Dermatologist Approved".to_owned()),
            ingredients: "Purified Water, Aloe Vera Extract, Shea Butter, Coconut Oil, Neem \
                Extract, Turmeric Extract, Tea Tree Oil, Calendula Extract, Vitamin E, Glycerin."
                .to_owned(),
            allergens: strings(&["May contain tree nut derivatives (coconut, shea)"]),
            values: skin_care_values(),
            category: Category::SkinCare,
            in_stock: true,
        },
        Product {
            id: ProductId::new(5),
            title: "PSORIGO Body Wash".to_owned(),
            description: "A soap-free cleanser for sensitive skin that lifts away impurities \
                while locking in moisture."
                .to_owned(),
            price: Money::rupees(1499),
            images: gallery("psorigo-wash"),
            badge: Some("Gentle Formula".to_owned()),
            ingredients: "Purified Water, Glycerin, Aloe Vera Juice, Decyl Glucoside, Dead Sea \
                Minerals, Colloidal Oatmeal, Chamomile Extract, Lavender Oil, Vitamin B5."
                .to_owned(),
            allergens: strings(&["May contain oat derivatives"]),
            values: skin_care_values(),
            category: Category::SkinCare,
            in_stock: true,
        },
        Product {
            id: ProductId::new(6),
            title: "PSORIGO Oil".to_owned(),
            description: "A rich herbal treatment that hydrates deeply, soothes itchiness, and \
                reduces inflammation without a greasy finish."
                .to_owned(),
            price: Money::rupees(1499),
            images: gallery("psorigo-oil"),
            badge: Some("100% Natural".to_owned()),
            ingredients: "Coconut Oil, Neem Oil, Tea Tree Oil, Black Seed Oil, Turmeric Extract, \
                Aloe Vera Extract, Vitamin E, Evening Primrose Oil, Calendula Oil, Jojoba Oil."
                .to_owned(),
            allergens: strings(&["May contain tree nut derivatives (coconut, jojoba)"]),
            values: skin_care_values(),
            category: Category::SkinCare,
            in_stock: true,
        },
    ]
}

fn skin_care_values() -> Vec<ValueBadge> {
    vec![
        badge("SF", "Soap-Free"),
        badge("PF", "Paraben-Free"),
        badge("pH", "pH Balanced"),
    ]
}

pub(super) fn deals() -> Vec<Deal> {
    vec![
        Deal {
            slug: "sampoorn-arogya".to_owned(),
            title: "Sampoorn Arogya Wellness Offer".to_owned(),
            description: "Strengthen immunity, improve digestion, and boost vitality, now at 15% \
                OFF for a limited time."
                .to_owned(),
            product_ids: vec![ProductId::new(1)],
            discount_percent: 15,
            bundle: None,
        },
        Deal {
            slug: "dr-joints".to_owned(),
            title: "Dr. Joints Mobility Deal".to_owned(),
            description: "Clinically tested to reduce stiffness and support flexibility. Now \
                available at 10% OFF."
                .to_owned(),
            product_ids: vec![ProductId::new(2)],
            discount_percent: 10,
            bundle: None,
        },
        Deal {
            slug: "beyondslim".to_owned(),
            title: "Beyondslim Limited-Time Offer".to_owned(),
            description: "Boost your metabolism and support your weight goals, now 12% OFF."
                .to_owned(),
            product_ids: vec![ProductId::new(3)],
            discount_percent: 12,
            bundle: None,
        },
        Deal {
            slug: "psorigo".to_owned(),
            title: "PSORIGO Skin Care Bundle Deal".to_owned(),
            description: "Get the complete PSORIGO care set of Body Lotion, Wash and Oil for one \
                special price."
                .to_owned(),
            product_ids: vec![ProductId::new(4), ProductId::new(5), ProductId::new(6)],
            discount_percent: 20,
            bundle: Some(Bundle {
                price: Money::rupees(3599),
                original_price: Money::rupees(4497),
            }),
        },
    ]
}
