use crate::record::Record;

/// Render the full report: a filterable table of records sorted best-first,
/// plus a per-record strip of full-size images toggled from the previews.
pub fn render(records: &[Record]) -> String {
    let mut html = String::from(HEADER);
    html.push_str(TABLE_HEADER);

    for rec in records {
        html.push_str(&row(rec));
    }
    html.push_str("</tbody></table>");

    html.push_str("<script>var images = {");
    let strips: Vec<String> = records
        .iter()
        .map(|r| format!("\"{}\": '{}'", r.id, big_images(r)))
        .collect();
    html.push_str(&strips.join(", "));
    html.push_str("};</script>");

    html.push_str(FOOTER);
    html
}

fn row(rec: &Record) -> String {
    let previews: String = rec
        .images
        .iter()
        .take(5)
        .map(|i| format!("<img class='imgpreview' src='{}'>", i))
        .collect();

    let facilities = facilities(rec);
    let link_name = rec.url.split('/').nth(2).unwrap_or("link");

    format!(
        "<tr class='grid' id='{id}'><td>{id}</td><td>{score}</td><td>{district}</td><td>{street}</td><td>{price}</td>\
         <td>{rooms}</td><td>{sqm}</td><td>{floor}</td><td>{floor_max}</td>\
         <td>{elevator}</td><td>{internet}</td><td>{view}</td>\
         <td>{balcony}</td><td>{facilities}</td><td>{parking}</td>\
         <td>{furniture}</td><td>{subway}</td><td>{distance:.1}</td>\
         <td>{previews}</td>\
         <td><a target=_blank href='{url}'>{link_name}</a></td></tr>",
        id = rec.id,
        score = rec.score as i64,
        district = rec.district,
        street = rec.street,
        price = rec.price as i64,
        rooms = rec.rooms,
        sqm = rec.sqm,
        floor = rec.floor,
        floor_max = rec.floor_max,
        elevator = if rec.elevator != 0 { "Elevator" } else { "-" },
        internet = if rec.internet != 0 { "Inet" } else { "-" },
        view = rec.view.label(),
        balcony = if rec.balcony != 0 { "Balcony" } else { "-" },
        facilities = facilities,
        parking = if rec.garage != 0 {
            "Garage"
        } else if rec.parkslot != 0 {
            "Parkslot"
        } else {
            "-"
        },
        furniture = if rec.cozy != 0 {
            "Cozy"
        } else if rec.furniture != 0 {
            "Furnit"
        } else {
            "-"
        },
        subway = if rec.subway != 0 { "Metro" } else { "-" },
        distance = rec.distance,
        previews = previews,
        url = rec.url,
        link_name = link_name,
    )
}

fn facilities(rec: &Record) -> String {
    let flags: [(&str, i64); 16] = [
        ("park", rec.park),
        ("pool", rec.pool),
        ("gym", rec.gym),
        ("restaurants", rec.restaurants),
        ("calm", rec.calm),
        ("fireplace", rec.fireplace),
        ("unique", rec.unique),
        ("luxury", rec.luxury),
        ("luxe", rec.luxe),
        ("prestigious", rec.prestigious),
        ("renovated", rec.renovated),
        ("location", rec.location),
        ("mall", rec.mall),
        ("supermarket", rec.supermarket),
        ("transport", rec.transport),
        ("leisure", rec.leisure),
    ];

    let present: Vec<&str> = flags
        .iter()
        .filter(|(_, v)| *v != 0)
        .map(|(name, _)| *name)
        .collect();

    if present.is_empty() {
        "-".to_string()
    } else {
        present.join(", ")
    }
}

/// Full-size image strip for one record; thumbnail path segments upgrade
/// to the big variants.
fn big_images(rec: &Record) -> String {
    let mut images: String = rec
        .images
        .iter()
        .map(|i| format!("<img class=\"imgbig\" src=\"{}\">", i))
        .collect();
    if images.contains("imot.") {
        images = images.replace("/small/", "/big/").replace("/med/", "/big/");
    }
    images
}

const TABLE_HEADER: &str = "<table id='apartments' class='countries-tiny'><thead><tr>\
    <th>#</th><th>Score</th><th>District</th><th>Street</th><th>Price (EUR)</th>\
    <th>Rooms</th><th>Sq.m</th><th>Floor</th><th>Floor (max)</th>\
    <th>Elevator</th><th>Internet</th><th>View</th><th>Balcony</th>\
    <th>Environment</th><th>Parking</th>\
    <th>Furnt.</th><th>Subway</th><th>Dist (KM)</th>\
    <th>Images</th>\
    <th>Link</th>\
    </tr><tbody>";

const HEADER: &str = r#"
<html lang="en">
  <head>
    <meta http-equiv="Content-Type" content="text/html; charset=utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Apartments report</title>

    <link rel="stylesheet" href="https://www.tablefilter.com/assets/css/bootstrap.min.css">
    <link href="https://www.tablefilter.com/assets/css/bootstrap-theme.min.css" rel="stylesheet">
    <link href="https://www.tablefilter.com/assets/css/theme.css" rel="stylesheet">
    <link href="https://www.tablefilter.com/tablefilter/style/tablefilter.css" rel="stylesheet">
    <script src="https://www.tablefilter.com/tablefilter/tablefilter.js"></script>
  </head>
<body>

<script src="https://code.jquery.com/jquery-3.4.1.min.js" integrity="sha256-CSXorXvZcTkaix6Yvo6HppcZGetbYMGWSFlBw8HfCJo="
  crossorigin="anonymous"></script>

<style>
body { padding: 5px; }
table.TF th, table.TF tr.fltrow td { background-color: #d8d8d8; border: 1px solid #fff; }
table.TF th, table.TF td {padding: 1px 2px; font-size: 12px; }
table.TF td img.imgpreview { padding: 1px; float: left; height: 60px; }
table.TF tr.details td { background-color: #333; }
table.TF td img.imgbig { padding: 0px; border: 1px solid #fff; float: left; height: 260px; }
table.TF td { border: 1px solid #fff; }
table.TF tr:nth-child(even) { background: #f0f0f0; }
table.TF tr:nth-child(odd) { background: #f8f8f8; }
table.TF tr:nth-child(even).selected { background: #f8f0e0; }
table.TF tr:nth-child(odd).selected { background: #fff7e5; }
</style>
"#;

const FOOTER: &str = r##"
<script data-config>

function hide_all_details() {
    console.log("hide all details");
    $(".details").remove();
}

function init_table() {
    var filtersConfig = {
        base_path: 'https://www.tablefilter.com/tablefilter/',
        col_0: 'none',
        col_1: 'none',
        col_2: 'multiple',
        col_3: 'multiple',
        col_4: 'none',
        col_5: 'multiple',
        col_6: 'none',
        col_7: 'multiple',
        col_8: 'multiple',
        col_9: 'multiple',
        col_10: 'multiple',
        col_11: 'multiple',
        col_12: 'multiple',
        col_14: 'multiple',
        col_15: 'multiple',
        col_16: 'multiple',
        col_17: 'multiple',
        col_18: 'none',
        col_19: 'none',
        col_widths: [
            '30px', '40px', '80px', '100px',
            '45px', '45px', '45px', '50px',
            '50px', '60px', '60px', '60px',
            '60px', '100px', '60px', '50px',
            '60px', '50px', '460px', '100px'
        ],
        col_types: [
            'number',
            'number',
            'string',
            'string',
            'number',
            'number',
            'number',
            'number',
            'number',
            'string',
            'string',
            'string',
            'string',
            'string',
            'string',
            'string',
            'string',
            'string',
            'number',
        ],
        extensions: [{ name: 'sort' }]
    };
    var tf = new TableFilter('apartments', filtersConfig);

    tf.onBeforeFilter = function(o) { hide_all_details(); }
    tf.onBeforeSort = function(o, colIndex) { hide_all_details(); }
    tf.init();
}
init_table();

$(document).ready(function() {

    $('img.imgpreview').click(function(){
        $curRow = $(this).closest('tr');
        $curId = $curRow.attr('id');
        var details = $curId + "_details";

        if ($("#" + details).length) {
            $("#" + details).remove();
        } else {
            $curRow.after('<tr class="details" id="' + details + '"><td colspan="21">' + images[$curId] + '</td></tr>')
        }
    });

    $('tr.fltrow th').click(function(){ hide_all_details(); });
    $('tr.fltrow td').click(function(){ hide_all_details(); });
    $('tr.grid').click(function(){ $(this).toggleClass("selected"); });
});

</script>
</body>
"##;

// ── Tests ──
