/// A catalogue mixing default, included and unknown `xsi:type` markers.
pub const CATALOG: &str = r#"<catalog xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <item sku="b1" xsi:type="Book"><title>Dune</title></item>
    <item sku="p1"><title>Pen</title></item>
    <note>misc</note>
    <item sku="t1" xsi:type="Toy" xsi:nil="true"/>
    <item sku="b2" xsi:type=" Book "><title>Emma</title></item>
</catalog>"#;

/// Type map that also includes the `Toy` marker.
pub const TYPES_JSON: &str = r#"{
    "default_type": "Product",
    "included": {
        "Book": "BookProduct",
        "Toy": "ToyProduct"
    }
}"#;
