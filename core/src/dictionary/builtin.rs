//! Checked-in dictionary contents.
//!
//! Rows are listed in rank order (descending expected frequency). A published
//! version is never edited; a new version appends rows to the previous one.

pub struct Row {
    pub key: &'static str,
    pub morpheme: &'static str,
    pub quenya_root: &'static str,
    pub gloss: &'static str,
    pub ast_nodes: &'static [&'static str],
}

const fn row(
    key: &'static str,
    morpheme: &'static str,
    quenya_root: &'static str,
    gloss: &'static str,
    ast_nodes: &'static [&'static str],
) -> Row {
    Row { key, morpheme, quenya_root, gloss, ast_nodes }
}

/// Dictionary 1.0.
pub static ROWS_V1_0: &[Row] = &[
    row(
        "construct:function",
        "kar",
        "kar-",
        "to make or do",
        &["FunctionDeclaration", "FunctionDef", "FuncDecl"],
    ),
    row(
        "construct:async_function",
        "karilya",
        "karilya-",
        "to do with swiftness",
        &["AsyncFunctionDeclaration", "AsyncFunctionDef"],
    ),
    row(
        "construct:lambda",
        "karmin",
        "karmin-",
        "to fashion briefly",
        &["LambdaExpression", "Lambda"],
    ),
    row(
        "construct:method",
        "karno",
        "karno-",
        "an act performed within",
        &["MethodDeclaration", "FunctionMember"],
    ),
    row(
        "construct:class",
        "noss",
        "noss-",
        "kindred or clan",
        &["ClassDeclaration", "StructDeclaration"],
    ),
    row(
        "construct:interface",
        "nossiel",
        "nossiël-",
        "kindred-path",
        &["InterfaceDeclaration", "ProtocolDeclaration"],
    ),
    row(
        "construct:struct",
        "nort",
        "norto-",
        "thing made firm",
        &["StructDeclaration", "RecordStruct"],
    ),
    row("construct:enum", "host", "hosta-", "assembled group", &["EnumDeclaration"]),
    row("construct:module", "parma", "parma-", "book or collection", &["Module", "Namespace"]),
    row(
        "construct:import",
        "tulpar",
        "tul-",
        "come to gather",
        &["ImportStatement", "UseDeclaration", "IncludeDirective"],
    ),
    row("construct:export", "auta", "auta-", "to go away", &["ExportStatement"]),
    row("construct:block", "sand", "sand-", "shielded place", &["BlockStatement", "Suite"]),
    row("construct:if", "ce", "ce-", "if, maybe", &["IfStatement", "ConditionalExpression"]),
    row("construct:elif", "cepen", "cepen-", "if again", &["ElifClause"]),
    row("construct:else", "epesse", "epessë-", "otherwise", &["ElseClause"]),
    row("construct:while", "yor", "yor-", "to do repeatedly", &["WhileStatement"]),
    row(
        "construct:for",
        "lenda",
        "lend-",
        "go,
        travel",
        &["ForStatement", "ForInStatement", "RangeStatement"],
    ),
    row(
        "construct:foreach",
        "lendor",
        "lend-",
        "go among",
        &["ForeachStatement", "ForEachStatement"],
    ),
    row("construct:loop_generic", "yorna", "yorna-", "to repeat", &["LoopStatement", "Loop"]),
    row("construct:do_while", "yornal", "yor-", "repeat until", &["DoWhileStatement"]),
    row("construct:switch", "tenya", "tenya-", "to denote", &["SwitchStatement", "MatchStatement"]),
    row("construct:case", "tenar", "tenar-", "marked choice", &["CaseClause", "MatchCase"]),
    row("construct:default", "tenarwa", "tenarwa-", "the marked remainder", &["DefaultClause"]),
    row("construct:try", "valya", "valya-", "to dare", &["TryStatement"]),
    row("construct:catch", "mapa", "mapa-", "to seize", &["CatchClause", "ExceptHandler"]),
    row("construct:finally", "metta", "metta-", "end or finish", &["FinallyClause"]),
    row("construct:throw", "hat", "hat-", "to hurl", &["ThrowStatement", "RaiseStatement"]),
    row("construct:yield", "anta", "anta-", "to give", &["YieldExpression", "YieldFrom"]),
    row("construct:return", "ent", "ent-", "to give back", &["ReturnStatement"]),
    row("construct:break", "rup", "rúpa-", "to break", &["BreakStatement"]),
    row("construct:continue", "vesta", "vesta-", "to endure", &["ContinueStatement"]),
    row("construct:pass", "sesta", "sesta-", "to let go", &["PassStatement"]),
    row("construct:annotation", "tenca", "tenca-", "to write, sign", &["Annotation", "Decorator"]),
    row("construct:comment", "quetta", "quetta-", "word or saying", &["Comment"]),
    row(
        "construct:directive",
        "narma",
        "narma-",
        "instruction",
        &["PragmaDirective", "CompilerDirective"],
    ),
    row("type:int", "nelya", "nelya-", "third, counting number", &["IntType", "i32", "int"]),
    row("type:float", "linga", "linga-", "to float or hang", &["FloatType", "f64", "double"]),
    row("type:string", "lambre", "lambë-", "tongue, language", &["StringType", "str"]),
    row("type:bool", "nanwa", "nanwa-", "true/affirmed", &["BoolType"]),
    row("type:char", "telpe", "tyelpë-", "symbol", &["CharType"]),
    row("type:array", "hostar", "hosta-", "collection", &["ArrayType", "SliceType", "ListType"]),
    row("type:tuple", "veri", "verya-", "to join", &["TupleType"]),
    row("type:object", "sana", "sana-", "thing", &["ObjectType", "ClassType"]),
    row("type:map", "nore", "nórë-", "land, domain", &["MapType", "DictionaryType"]),
    row("type:set", "osta", "osta-", "assembly", &["SetType"]),
    row("type:option", "mara", "mára-", "good/possible", &["OptionalType", "OptionType"]),
    row("type:result", "turma", "turma-", "victory result", &["ResultType"]),
    row("type:void", "lusta", "lussa-", "empty", &["VoidType", "NoneType", "UnitType"]),
    row("type:any", "ilya", "ilya-", "all", &["AnyType"]),
    row("type:never", "umbar", "umbar-", "doom, never occurs", &["NeverType"]),
    row("type:byte", "peke", "pecë-", "small piece", &["ByteType"]),
    row("type:short", "titta", "titta-", "small", &["ShortType", "i16"]),
    row("type:long", "anda", "anda-", "long", &["LongType", "i64", "long"]),
    row("type:decimal", "mindor", "mindor-", "numerical detail", &["DecimalType"]),
    row("type:bigint", "alta", "alta-", "great", &["BigIntType", "BigInteger"]),
    row("type:promise", "estel", "estel-", "hope/trust", &["PromiseType", "FutureType"]),
    row("type:iterator", "rehta", "rehta-", "to trail", &["IteratorType", "GeneratorType"]),
    row("type:channel", "sirya", "sirya-", "flowing river", &["ChannelType", "StreamType"]),
    row("type:pointer", "tiel", "tië-", "path", &["PointerType", "ReferenceType"]),
    row("type:reference", "tieme", "tië-", "path connection", &["ReferenceType", "BorrowType"]),
    row("type:fnptr", "karta", "karta-", "shape of doing", &["FunctionPointerType"]),
    row("type:union", "omenta", "oment-", "meeting", &["UnionType", "SumType"]),
    row("type:intersection", "osanya", "osanya-", "joining crossing", &["IntersectionType"]),
    row("type:structural", "nilda", "nilda-", "friendship/binding", &["StructuralType"]),
    row("type:nominal", "esse", "essë-", "name", &["NominalType"]),
    row("type:literal", "sanga", "sanga-", "firm, exact", &["LiteralType"]),
    row("op:add", "yonta", "yon-", "add together", &["BinaryExpression:+"]),
    row("op:sub", "rac", "rac-", "to break off", &["BinaryExpression:-"]),
    row("op:mul", "yulma", "yul-", "to drink up/mix", &["BinaryExpression:*"]),
    row("op:div", "hehta", "hehta-", "to discard apart", &["BinaryExpression:/"]),
    row("op:mod", "metya", "metya-", "to measure remainder", &["BinaryExpression:%"]),
    row("op:pow", "turion", "tur-", "to master raise", &["BinaryExpression:**", "PowExpression"]),
    row("op:eq", "same", "same-", "equal", &["BinaryExpression:==", "EqualityExpression"]),
    row("op:neq", "ava", "ava-", "not", &["BinaryExpression:!=", "InequalityExpression"]),
    row("op:lt", "pitya", "pitya-", "small", &["BinaryExpression:<"]),
    row("op:gt", "alta", "alta-", "great", &["BinaryExpression:>"]),
    row("op:le", "pityar", "pitya-", "small or equal", &["BinaryExpression:<="]),
    row("op:ge", "altar", "alta-", "great or equal", &["BinaryExpression:>="]),
    row("op:and", "yo", "yo-", "and", &["LogicalExpression:&&", "BoolOp:And"]),
    row("op:or", "var", "var-", "or", &["LogicalExpression:||", "BoolOp:Or"]),
    row("op:not", "lá", "lá-", "no", &["UnaryExpression:!", "UnaryOp:Not"]),
    row("op:bit_and", "tulka", "tulka-", "strength joining", &["BinaryExpression:&"]),
    row("op:bit_or", "tyali", "tyalië-", "play/alternate", &["BinaryExpression:|"]),
    row("op:bit_xor", "laure", "laurë-", "golden mix", &["BinaryExpression:^"]),
    row("op:bit_not", "mor", "mor-", "dark inversion", &["UnaryExpression:~"]),
    row("op:shift_left", "lenge", "leng-", "lean left", &["BinaryExpression:<<"]),
    row("op:shift_right", "lengea", "leng-", "lean right", &["BinaryExpression:>>"]),
    row("op:coalesce", "onta", "onta-", "beget join", &["NullishCoalescing"]),
    row("op:ternary", "ceanta", "ceanta-", "if-split", &["ConditionalExpression:?"]),
    row("op:pipe", "siryo", "siryo-", "flow", &["PipeExpression", "MethodChain"]),
    row("op:range_incl", "pelda", "pelda-", "fence inclusive", &["RangeExpression:..="]),
    row("op:range_excl", "peldaë", "pelda-", "fence exclusive", &["RangeExpression:.."]),
    row("op:assign", "antya", "antya-", "to give to", &["Assignment"]),
    row("op:add_assign", "antyayon", "antya-", "give additionally", &["Assignment:+="]),
    row("op:sub_assign", "antyarac", "antya-", "give subtractively", &["Assignment:-="]),
    row("op:mul_assign", "antyayul", "antya-", "give multiplicatively", &["Assignment:*="]),
    row("op:div_assign", "antyaheh", "antya-", "give divisively", &["Assignment:/="]),
    row("op:mod_assign", "antyamet", "antya-", "give remainder", &["Assignment:%="]),
    row("op:bit_and_assign", "antyatul", "antya-", "give bitwise and", &["Assignment:&="]),
    row("op:bit_or_assign", "antyavar", "antya-", "give bitwise or", &["Assignment:|="]),
    row("op:bit_xor_assign", "antyalaur", "antya-", "give bitwise xor", &["Assignment:^="]),
    row("op:shift_left_assign", "antyaleng", "antya-", "give shift left", &["Assignment:<<="]),
    row("op:shift_right_assign", "antyalengw", "antya-", "give shift right", &["Assignment:>>="]),
    row("op:logical_and_assign", "antyayo", "antya-", "give logical and", &["Assignment:&&="]),
    row("op:logical_or_assign", "antyavar", "antya-", "give logical or", &["Assignment:||="]),
    row("op:nullish_assign", "antyaonta", "antya-", "give nullish", &["Assignment:??="]),
    row("op:await", "harta", "harta-", "to wait/watch", &["AwaitExpression"]),
    row("op:new", "ontaqua", "onta-", "bring into being", &["NewExpression", "ConstructorCall"]),
    row("op:call", "tulya", "tulya-", "to invoke", &["CallExpression"]),
    row("flow:return", "enta", "ent-", "give back", &["ReturnStatement"]),
    row("flow:break", "rusta", "rus-", "break off", &["BreakStatement"]),
    row("flow:continue", "vestar", "vesta-", "keep going", &["ContinueStatement"]),
    row("flow:throw", "hatten", "hat-", "hurl", &["ThrowStatement"]),
    row("flow:yield", "antal", "anta-", "give forth", &["YieldStatement", "YieldExpression"]),
    row("flow:await", "hartan", "harta-", "watch", &["AwaitExpression"]),
    row("flow:return_async", "entalya", "ent-", "give back swiftly", &["ReturnStatement"]),
    row("flow:break_label", "rusto", "rus-", "break at mark", &["BreakStatement:Labeled"]),
    row(
        "flow:continue_label",
        "vesto",
        "vesta-",
        "continue at mark",
        &["ContinueStatement:Labeled"],
    ),
    row("flow:goto", "lenduva", "lendu-", "go toward", &["GotoStatement"]),
    row("flow:fallthrough", "peleta", "pelet-", "to pass through", &["FallthroughStatement"]),
    row("flow:defer", "hantale", "hantale-", "gratitude/later", &["DeferStatement"]),
    row("flow:panic", "ruhta", "ruhta-", "terror drive", &["Panic", "Abort"]),
    row("flow:match_break", "tenrup", "ten-", "mark break", &["MatchBreak"]),
    row("flow:loop_exit", "yorend", "yor-", "end of loop", &["LoopExit"]),
    row("flow:loop_continue", "yorvest", "yor-", "repeat continue", &["LoopContinue"]),
    row("flow:tail_call", "entul", "ent-", "return-call", &["TailCall"]),
    row("flow:resume", "enyal", "enyal-", "remember resume", &["ResumeStatement"]),
    row("flow:suspend", "nurta", "nurta-", "to hide/hold", &["SuspendStatement"]),
    row("flow:checkpoint", "tirme", "tirme-", "to watch", &["Checkpoint"]),
    row("flow:rewind", "andar", "andar-", "go back", &["RewindStatement"]),
    row("flow:retry", "ceya", "ceya-", "to try again", &["RetryStatement"]),
    row("flow:exit", "auta", "auta-", "depart program", &["ExitStatement"]),
    row("flow:halt", "tulka", "tulka-", "stand firm", &["HaltInstruction"]),
    row("flow:trap", "raumo", "raumo-", "storm/trap", &["TrapInstruction"]),
    row("oop:class", "nossan", "noss-", "kindred grouping", &["ClassDeclaration"]),
    row("oop:abstract_class", "nossal", "noss-", "kindred veiled", &["AbstractClassDeclaration"]),
    row("oop:interface", "nossiel", "nossiël-", "interface kindred", &["InterfaceDeclaration"]),
    row("oop:trait", "saira", "sairë-", "distinctive feature", &["TraitDeclaration"]),
    row("oop:impl", "haryon", "harya-", "to possess", &["ImplementationBlock"]),
    row("oop:method", "karion", "kar-", "doing within type", &["MethodDeclaration"]),
    row("oop:constructor", "ontion", "onta-", "begetting", &["ConstructorDeclaration"]),
    row("oop:destructor", "ruhtion", "ruhta-", "tearing down", &["DestructorDeclaration"]),
    row(
        "oop:property",
        "sambë",
        "sambë-",
        "room/house",
        &["PropertyDeclaration", "FieldDeclaration"],
    ),
    row("oop:getter", "sambetul", "sambë-", "house bring", &["GetterMethod"]),
    row("oop:setter", "sambenta", "sambë-", "house give", &["SetterMethod"]),
    row("oop:field", "talan", "talan-", "plane, floor", &["FieldDeclaration"]),
    row("oop:static_field", "talanda", "talan-", "fixed floor", &["StaticFieldDeclaration"]),
    row("oop:static_method", "karand", "kar-", "doing fixed", &["StaticMethodDeclaration"]),
    row("oop:virtual_method", "karfir", "kar-", "doing phantom", &["VirtualMethodDeclaration"]),
    row("oop:override", "arta", "arta-", "exalted over", &["OverrideSpecifier"]),
    row("oop:implements", "haryal", "harya-", "possess interface", &["ImplementsClause"]),
    row("oop:extends", "telya", "telya-", "to finish/extend", &["ExtendsClause"]),
    row("oop:inherits", "toron", "toron-", "brotherhood", &["InheritanceClause"]),
    row("oop:mixins", "erya", "erya-", "to stir", &["MixinClause"]),
    row("oop:interface_method", "nossilkar", "nossiël-", "interface doing", &["InterfaceMethod"]),
    row("oop:sealed", "hresta", "hresta-", "shore boundary", &["SealedClass"]),
    row("oop:record", "histar", "hista-", "list/record", &["RecordClass"]),
    row("oop:partial", "mitta", "mitta-", "between/part", &["PartialClass"]),
    row("oop:annotation", "tenceli", "tenca-", "marked class", &["ClassAttribute"]),
    row("modifier:public", "calya", "calya-", "bright/open", &["PublicModifier"]),
    row("modifier:private", "nulya", "nulya-", "hidden", &["PrivateModifier"]),
    row("modifier:protected", "varya", "varya-", "to shield", &["ProtectedModifier"]),
    row("modifier:internal", "mirya", "mirya-", "within", &["InternalModifier"]),
    row("modifier:static", "tulca", "tulca-", "firm", &["StaticModifier"]),
    row("modifier:final", "metta", "metta-", "final", &["FinalModifier", "ConstModifier"]),
    row("modifier:const", "tulta", "tulta-", "to steady", &["ConstModifier"]),
    row("modifier:readonly", "hlarë", "hlarë-", "listening only", &["ReadonlyModifier"]),
    row("modifier:mutable", "virya", "virya-", "to change", &["MutableModifier"]),
    row("modifier:async", "linta", "linta-", "swift", &["AsyncModifier"]),
    row("modifier:awaitable", "horta", "horta-", "to urge", &["AwaitableMarker"]),
    row("modifier:volatile", "farina", "fárina-", "hunting, unsettled", &["VolatileModifier"]),
    row("modifier:override", "arta", "arta-", "exalted over", &["OverrideModifier"]),
    row("modifier:virtual", "firya", "firya-", "to fade", &["VirtualModifier"]),
    row("modifier:abstract", "hsaila", "hsaila-", "shadowy", &["AbstractModifier"]),
    row("modifier:sealed", "hresta", "hresta-", "shore boundary", &["SealedModifier"]),
    row("modifier:open", "panta", "panta-", "open", &["OpenModifier"]),
    row("modifier:required", "mahta", "mahta-", "to demand", &["RequiredModifier"]),
    row("modifier:optional", "merna", "merna-", "wishful", &["OptionalModifier"]),
    row("modifier:default", "yáve", "yáve-", "fruit/standard", &["DefaultModifier"]),
    row("modifier:partial", "mitta", "mitta-", "partial", &["PartialModifier"]),
    row("modifier:extern", "eltir", "eltir-", "to look afar", &["ExternModifier"]),
    row("modifier:inline", "aquapa", "aquapa-", "fully close", &["InlineModifier"]),
    row("modifier:noexcept", "úcare", "úcarë-", "without error", &["NoExceptSpecifier"]),
    row("modifier:constexpr", "sanwe", "sanwë-", "thought-known", &["ConstexprSpecifier"]),
    row("modifier:template", "lindal", "lindal-", "song pattern", &["TemplateParameter"]),
    row("modifier:generic", "aila", "aila-", "shining general", &["GenericParameter"]),
    row("modifier:covariant", "telu", "telu-", "ending upward", &["CovariantModifier"]),
    row(
        "modifier:contravariant",
        "nutelu",
        "nu-telu-",
        "ending downward",
        &["ContravariantModifier"],
    ),
    row("modifier:invariant", "stal", "stal-", "fixed", &["InvariantModifier"]),
    row(
        "modifier:synchronized",
        "ostya",
        "ostya-",
        "to gather together",
        &["SynchronizedModifier"],
    ),
    row("literal:int", "min", "min-", "one", &["IntegerLiteral"]),
    row("literal:float", "loar", "loar-", "flood/flow", &["FloatLiteral"]),
    row("literal:string", "quet", "quet-", "speech", &["StringLiteral"]),
    row("literal:bool_true", "anwa", "anwa-", "true", &["BooleanLiteral:true"]),
    row("literal:bool_false", "vanwa", "vanwa-", "lost/false", &["BooleanLiteral:false"]),
    row("literal:null", "unyë", "únyë-", "not", &["NullLiteral", "NoneLiteral"]),
    row("literal:array", "hosty", "hosta-", "collection literal", &["ArrayLiteral", "ListLiteral"]),
    row("literal:object", "sambëa", "sambë-", "house-literal", &["ObjectLiteral", "DictLiteral"]),
    row("literal:regex", "lindë", "lindë-", "song pattern", &["RegexLiteral"]),
    row("literal:template", "lambet", "lambë-", "language template", &["TemplateLiteral"]),
    row("structure:identifier", "esse", "essë-", "name", &["Identifier"]),
    row("structure:qualifier", "essetil", "essë-", "name path", &["QualifiedName"]),
    row("structure:parameter", "colma", "colma-", "ring, supporting", &["Parameter"]),
    row("structure:argument", "colmar", "colma-", "supporting piece", &["Argument"]),
    row("structure:generic", "lindë", "lindë-", "song/pattern", &["TypeArgument"]),
    row("structure:type_constraint", "nertë", "nertë-", "bond", &["TypeConstraint"]),
    row("structure:where_clause", "mar", "mar-", "dwelling place", &["WhereClause"]),
    row("structure:block_start", "sandion", "sand-", "shielded begin", &["BlockStart"]),
    row("structure:block_end", "sandome", "sand-", "shielded end", &["BlockEnd"]),
    row("structure:line", "tehta", "tehta-", "mark", &["LineSeparator"]),
    row("structure:indent", "lant", "lant-", "drop down", &["Indent"]),
    row("structure:dedent", "halant", "halant-", "lift up", &["Dedent"]),
    row("structure:comma", "sepa", "sepa-", "lip/border", &["CommaSeparator"]),
    row("structure:colon", "hyarmen", "hyarmen-", "south/guide", &["ColonSeparator"]),
    row("structure:semicolon", "hyarmenya", "hyarmen-", "guiding pause", &["SemicolonSeparator"]),
    row("structure:dot", "pica", "pica-", "spot", &["DotSeparator"]),
    row("structure:arrow", "lange", "lange-", "pointing", &["Arrow"]),
    row("structure:fat_arrow", "langewa", "lange-", "heavy pointing", &["FatArrow"]),
    row("structure:ellipsis", "hir", "hir-", "to find ongoing", &["Ellipsis"]),
    row("structure:spread", "palya", "palya-", "to spread", &["SpreadElement"]),
    row("meta:dictionary_version", "yando", "yando-", "bridge generation", &["DictionaryVersion"]),
    row("meta:payload_marker", "quetten", "quetta-", "speech marker", &["PayloadMarker"]),
    row("meta:unknown", "úment", "úmenta-", "not told", &["UnknownToken"]),
    row("meta:padding", "caita", "caita-", "to lie down", &["Padding"]),
    row("meta:checksum", "hostale", "hostalë-", "collection counting", &["Checksum"]),
    row("meta:version_header", "mindon", "mindon-", "tower signal", &["StreamVersionHeader"]),
    row("meta:stream_start", "yestar", "yestar-", "first day", &["StreamStart"]),
    row("meta:stream_end", "mettar", "mettar-", "ending day", &["StreamEnd"]),
    row("meta:human_readable", "lamen", "lamen-", "animal voice", &["HumanReadable"]),
    row("meta:diagnostic", "tirmar", "tirmar-", "watcher", &["DiagnosticMarker"]),
];

/// Rows appended by dictionary 1.1.
pub static ROWS_V1_1_APPENDED: &[Row] = &[
    row(
        "construct:with",
        "arwa",
        "arwa-",
        "in possession of",
        &["WithStatement", "UsingStatement"],
    ),
    row(
        "construct:async_with",
        "arwalinta",
        "arwa-",
        "swiftly in possession of",
        &["AsyncWithStatement", "AsyncWith"],
    ),
    row(
        "construct:comprehension",
        "hostalë",
        "hosta-",
        "gathering made whole",
        &["ListComp", "SetComp", "DictComp", "Comprehension"],
    ),
    row(
        "construct:generator",
        "ontalë",
        "onta-",
        "begetting in turn",
        &["GeneratorExp", "GeneratorExpression"],
    ),
    row("construct:assert", "tanca", "tanca-", "firm, certain", &["AssertStatement", "Assert"]),
    row("construct:delete", "nacil", "nac-", "to cut away", &["DeleteStatement", "Delete"]),
    row("construct:global", "ambar", "ambar-", "the whole world", &["GlobalStatement", "Global"]),
    row(
        "construct:nonlocal",
        "ambaron",
        "ambar-",
        "the nearer world",
        &["NonlocalStatement", "Nonlocal"],
    ),
    row("op:matmul", "yulmar", "yul-", "mix across", &["BinaryExpression:@", "MatMult"]),
    row("op:walrus", "antyaessë", "antya-", "give a name", &["NamedExpr", "AssignmentExpression"]),
    row("literal:bytes", "pecar", "pecë-", "small pieces", &["BytesLiteral"]),
    row(
        "literal:complex",
        "fanya",
        "fanya-",
        "cloud,
        twofold",
        &["ComplexLiteral", "ImaginaryLiteral"],
    ),
];

/// Rows for a built-in version, in rank order.
pub fn rows_for(version: &str) -> Option<Vec<&'static Row>> {
    match version {
        "1.0" => Some(ROWS_V1_0.iter().collect()),
        "1.1" => Some(ROWS_V1_0.iter().chain(ROWS_V1_1_APPENDED.iter()).collect()),
        _ => None,
    }
}
